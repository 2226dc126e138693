//! Canvas document and state management.

use crate::shapes::{SerializableColor, Shape, ShapeId, ShapeUpdate};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Offset applied to a duplicated shape so it does not cover its source.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Pointer slack used when hit-testing clicks.
pub const HIT_TOLERANCE: f64 = 2.0;

/// A canvas document containing all shapes and the canvas setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    pub z_order: Vec<ShapeId>,
    /// Canvas dimensions.
    pub size: Size,
    /// Canvas background color.
    pub background: SerializableColor,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0), SerializableColor::white())
    }
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new(size: Size, background: SerializableColor) -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            size,
            background,
        }
    }

    /// Add a shape on top of all others and return its ID.
    ///
    /// A shape whose ID is already taken is given a fresh one.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        while self.shapes.contains_key(&shape.id()) {
            shape.regenerate_id();
        }
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape from the document.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Clear all shapes and reset the background.
    pub fn clear(&mut self, background: SerializableColor) {
        self.shapes.clear();
        self.z_order.clear();
        self.background = background;
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Apply a partial update to a shape.
    /// Returns true if the shape exists and something changed.
    pub fn update_shape(&mut self, id: ShapeId, update: &ShapeUpdate) -> bool {
        self.shapes
            .get_mut(&id)
            .map(|shape| shape.apply_update(update))
            .unwrap_or(false)
    }

    /// Copy a shape, offset by [`DUPLICATE_OFFSET`], on top of all others.
    /// Returns the copy's ID, or None if the source does not exist.
    pub fn duplicate_shape(&mut self, id: ShapeId) -> Option<ShapeId> {
        let mut copy = self.shapes.get(&id)?.clone();
        copy.regenerate_id();
        copy.translate(DUPLICATE_OFFSET);
        Some(self.add_shape(copy))
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Set the canvas dimensions. Shapes are left untouched.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Set the background color. Shapes are left untouched.
    pub fn set_background(&mut self, color: SerializableColor) {
        self.background = color;
    }

    /// Find shapes at a point.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        // Return in reverse z-order (front to back) for selection priority
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    /// The frontmost shape under `point`, if any.
    pub fn top_shape_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.shapes
                    .get(id)
                    .is_some_and(|s| s.hit_test(point, HIT_TOLERANCE))
            })
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// What a pointer press on the canvas did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// An existing shape was under the pointer and is now selected.
    Selected(ShapeId),
    /// The active tool created a new shape, which is now selected.
    Created(ShapeId),
    /// Empty canvas was clicked with the select tool.
    Deselected,
}

/// Runtime canvas state: the document plus selection and tool state.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Currently selected shape.
    selection: Option<ShapeId>,
}

impl Canvas {
    /// Create a canvas with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: CanvasDocument) -> Self {
        Self {
            document,
            tool_manager: ToolManager::new(),
            selection: None,
        }
    }

    /// The selected shape ID.
    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    /// The selected shape.
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.and_then(|id| self.document.get_shape(id))
    }

    /// Select a shape. Returns false if the shape does not exist.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if self.document.get_shape(id).is_some() {
            self.selection = Some(id);
            true
        } else {
            false
        }
    }

    /// Clear selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Check if a shape is selected.
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection == Some(id)
    }

    /// Set the current tool. Returns the previous tool.
    pub fn set_tool(&mut self, tool: ToolKind) -> ToolKind {
        self.tool_manager.set_tool(tool)
    }

    /// The active tool.
    pub fn tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    /// Add a shape to the document.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.document.add_shape(shape)
    }

    /// Remove a shape, dropping the selection if it pointed at it.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.document.remove_shape(id)
    }

    /// Clear all shapes and the selection.
    pub fn clear(&mut self, background: SerializableColor) {
        self.selection = None;
        self.document.clear(background);
    }

    /// Apply a partial update to a shape.
    pub fn update_shape(&mut self, id: ShapeId, update: &ShapeUpdate) -> bool {
        self.document.update_shape(id, update)
    }

    /// Duplicate a shape. The selection is left as is.
    pub fn duplicate_shape(&mut self, id: ShapeId) -> Option<ShapeId> {
        self.document.duplicate_shape(id)
    }

    /// Delete the selected shape, returning its ID.
    pub fn delete_selected(&mut self) -> Option<ShapeId> {
        let id = self.selection.take()?;
        self.document.remove_shape(id).map(|_| id)
    }

    /// Route a pointer press.
    ///
    /// `hit` is the shape under the pointer as reported by whoever did the
    /// hit-testing. A hit always selects and never creates, regardless of the
    /// active tool. IDs no longer in the document count as empty canvas.
    pub fn handle_pointer_down(&mut self, point: Point, hit: Option<ShapeId>) -> PointerOutcome {
        if let Some(id) = hit.filter(|id| self.document.get_shape(*id).is_some()) {
            self.selection = Some(id);
            return PointerOutcome::Selected(id);
        }

        match self.tool_manager.create_shape_at(point) {
            Some(shape) => {
                let id = self.document.add_shape(shape);
                self.selection = Some(id);
                PointerOutcome::Created(id)
            }
            None => {
                self.selection = None;
                PointerOutcome::Deselected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Rectangle, ShapeKind, ShapeTrait, Text};

    fn filled_rect(x: f64, y: f64) -> Rectangle {
        let mut rect = Rectangle::new(Point::new(x, y), 100.0, 100.0);
        rect.style.fill_color = Some(SerializableColor::white());
        rect
    }

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::default();
        assert!(doc.is_empty());
        assert_eq!(doc.size, Size::new(800.0, 600.0));
        assert_eq!(doc.background, SerializableColor::white());
    }

    #[test]
    fn test_add_shape() {
        let mut doc = CanvasDocument::default();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        let added = doc.add_shape(Shape::Rectangle(rect));
        assert_eq!(added, id);
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape(id).is_some());
    }

    #[test]
    fn test_add_shape_with_taken_id() {
        let mut doc = CanvasDocument::default();
        let rect = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0));

        let first = doc.add_shape(rect.clone());
        let second = doc.add_shape(rect);
        assert_ne!(first, second);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.z_order, vec![first, second]);
    }

    #[test]
    fn test_remove_shape() {
        let mut doc = CanvasDocument::default();
        let id = doc.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));

        assert!(doc.remove_shape(id).is_some());
        assert!(doc.is_empty());
        assert!(doc.z_order.is_empty());
        assert!(doc.remove_shape(id).is_none());
    }

    #[test]
    fn test_clear_resets_background() {
        let mut doc = CanvasDocument::default();
        doc.set_background(SerializableColor::black());
        doc.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));

        doc.clear(SerializableColor::white());
        assert!(doc.is_empty());
        assert_eq!(doc.background, SerializableColor::white());

        doc.clear(SerializableColor::white());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_update_missing_shape() {
        let mut doc = CanvasDocument::default();
        let update = ShapeUpdate::new().with_stroke_width(4.0);
        assert!(!doc.update_shape(uuid::Uuid::new_v4(), &update));
    }

    #[test]
    fn test_duplicate_shape() {
        let mut doc = CanvasDocument::default();
        let source = Ellipse::centered_at(Point::new(100.0, 100.0));
        let source_id = doc.add_shape(Shape::Ellipse(source.clone()));

        let copy_id = doc.duplicate_shape(source_id).unwrap();
        assert_ne!(copy_id, source_id);
        assert_eq!(doc.z_order, vec![source_id, copy_id]);

        let Some(Shape::Ellipse(copy)) = doc.get_shape(copy_id) else {
            panic!("duplicate should be an ellipse");
        };
        assert_eq!(copy.position, Point::new(75.0, 75.0));
        assert_eq!(copy.radius, source.radius);
        assert_eq!(copy.style, source.style);

        let Some(Shape::Ellipse(original)) = doc.get_shape(source_id) else {
            panic!("source should still be an ellipse");
        };
        assert_eq!(*original, source);
    }

    #[test]
    fn test_duplicate_missing_shape() {
        let mut doc = CanvasDocument::default();
        assert!(doc.duplicate_shape(uuid::Uuid::new_v4()).is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_resize_keeps_shapes() {
        let mut doc = CanvasDocument::default();
        doc.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));
        doc.set_size(Size::new(1024.0, 768.0));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.size, Size::new(1024.0, 768.0));
    }

    #[test]
    fn test_shapes_at_point() {
        let mut doc = CanvasDocument::default();
        let id1 = doc.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));
        let id2 = doc.add_shape(Shape::Rectangle(filled_rect(50.0, 50.0)));

        // Point in both shapes
        let hits = doc.shapes_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![id2, id1]);
        assert_eq!(doc.top_shape_at(Point::new(75.0, 75.0)), Some(id2));

        // Point only in rect1
        let hits = doc.shapes_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits, vec![id1]);

        assert_eq!(doc.top_shape_at(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let mut doc = CanvasDocument::default();
        let a = doc.add_shape(Shape::Text(Text::placeholder_at(Point::new(1.0, 2.0))));
        let b = doc.add_shape(Shape::Rectangle(filled_rect(3.0, 4.0)));

        let restored = CanvasDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(restored.z_order, vec![a, b]);
        assert_eq!(restored.get_shape(a), doc.get_shape(a));
    }

    #[test]
    fn test_canvas_selection() {
        let mut canvas = Canvas::new();
        let id = canvas.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));

        assert!(!canvas.is_selected(id));
        assert!(canvas.select(id));
        assert!(canvas.is_selected(id));
        canvas.clear_selection();
        assert!(!canvas.is_selected(id));
        assert!(!canvas.select(uuid::Uuid::new_v4()));
        assert_eq!(canvas.selection(), None);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut canvas = Canvas::new();
        let a = canvas.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));
        let b = canvas.add_shape(Shape::Rectangle(filled_rect(200.0, 0.0)));

        canvas.select(a);
        canvas.remove_shape(b);
        assert_eq!(canvas.selection(), Some(a));

        canvas.remove_shape(a);
        assert_eq!(canvas.selection(), None);
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = Canvas::new();
        let id = canvas.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));

        assert_eq!(canvas.delete_selected(), None);
        canvas.select(id);
        assert_eq!(canvas.delete_selected(), Some(id));

        assert!(canvas.document.is_empty());
        assert_eq!(canvas.selection(), None);
    }

    #[test]
    fn test_clear_canvas() {
        let mut canvas = Canvas::new();
        let id = canvas.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));
        canvas.select(id);

        canvas.clear(SerializableColor::white());
        assert!(canvas.document.is_empty());
        assert_eq!(canvas.selection(), None);
    }

    #[test]
    fn test_pointer_creates_and_selects() {
        let mut canvas = Canvas::new();
        for tool in [ToolKind::Rectangle, ToolKind::Ellipse, ToolKind::Text] {
            canvas.set_tool(tool);
            let before = canvas.document.len();
            // Far apart so earlier shapes are never hit
            let point = Point::new(100.0 + 250.0 * before as f64, 100.0);
            let hit = canvas.document.top_shape_at(point);
            let outcome = canvas.handle_pointer_down(point, hit);

            let PointerOutcome::Created(id) = outcome else {
                panic!("{tool} should create a shape, got {outcome:?}");
            };
            assert_eq!(canvas.document.len(), before + 1);
            assert_eq!(canvas.selection(), Some(id));
        }
    }

    #[test]
    fn test_pointer_select_tool_on_empty_deselects() {
        let mut canvas = Canvas::new();
        let id = canvas.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));
        canvas.select(id);

        let outcome = canvas.handle_pointer_down(Point::new(500.0, 500.0), None);
        assert_eq!(outcome, PointerOutcome::Deselected);
        assert_eq!(canvas.selection(), None);
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_pointer_on_shape_never_creates() {
        let mut canvas = Canvas::new();
        let id = canvas.add_shape(Shape::Rectangle(filled_rect(0.0, 0.0)));
        canvas.set_tool(ToolKind::Ellipse);

        let outcome = canvas.handle_pointer_down(Point::new(50.0, 50.0), Some(id));
        assert_eq!(outcome, PointerOutcome::Selected(id));
        assert_eq!(canvas.document.len(), 1);
        assert_eq!(canvas.selection(), Some(id));
    }

    #[test]
    fn test_pointer_with_stale_hit_creates() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rectangle);

        let outcome = canvas.handle_pointer_down(Point::new(50.0, 50.0), Some(uuid::Uuid::new_v4()));
        assert!(matches!(outcome, PointerOutcome::Created(_)));
        let shape = canvas.selected_shape().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.position(), Point::new(0.0, 25.0));
    }
}

//! The editor shell: composes the canvas, tool state, properties panel and
//! render surface, and turns user input into state changes.

use crate::canvas::{Canvas, CanvasDocument, PointerOutcome};
use crate::config::{self, ConfigError, EditorConfig};
use crate::input::KeyEvent;
use crate::properties::{EditOutcome, PropertiesBridge, PropertyEdit, PropertyError, PropertyPanel};
use crate::shapes::{SerializableColor, ShapeId};
use crate::shortcuts::ShortcutAction;
use crate::surface::{ExportFormat, RenderSurface, SurfaceResult};
use crate::tools::ToolKind;
use kurbo::{Point, Size};

/// Notifications for whoever presents the editor (toolbar highlight,
/// status toasts, panels).
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged(ToolKind),
    SelectionChanged(Option<ShapeId>),
    ShapeAdded(ShapeId),
    ShapeRemoved(ShapeId),
    ShapeUpdated(ShapeId),
    CanvasCleared,
    CanvasResized(Size),
    BackgroundChanged(SerializableColor),
    /// Short user-facing status message.
    Notice(String),
}

/// Editor state for one canvas.
pub struct Editor<S: RenderSurface> {
    canvas: Canvas,
    config: EditorConfig,
    properties: PropertiesBridge,
    surface: S,
    events: Vec<EditorEvent>,
}

impl<S: RenderSurface> Editor<S> {
    /// Create an editor with an empty canvas set up from `config`.
    pub fn new(config: EditorConfig, mut surface: S) -> Self {
        let document = CanvasDocument::new(config.size(), config.background);
        surface.resize(document.size, document.background);
        log::info!(
            "Editor initialized - {}x{} background {}",
            document.size.width,
            document.size.height,
            document.background
        );
        Self {
            canvas: Canvas::with_document(document),
            config,
            properties: PropertiesBridge::new(),
            surface,
            events: Vec::new(),
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.canvas.document
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn tool(&self) -> ToolKind {
        self.canvas.tool()
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.canvas.selection()
    }

    /// Current properties panel contents.
    pub fn properties(&self) -> &PropertyPanel {
        self.properties.panel()
    }

    /// Take all notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.emit(EditorEvent::Notice(message.into()));
    }

    /// Re-derive the panel and report a selection change if there was one.
    fn selection_changed_from(&mut self, previous: Option<ShapeId>) {
        self.properties.sync(&self.canvas);
        let current = self.canvas.selection();
        if current != previous {
            self.emit(EditorEvent::SelectionChanged(current));
        }
    }

    /// Switch tools. Always notifies, even when re-selecting the active tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.canvas.set_tool(tool);
        log::info!("Tool: {}", tool.label());
        self.emit(EditorEvent::ToolChanged(tool));
        self.notice(format!("{} tool selected", tool.label()));
    }

    /// Handle a click, hit-testing against the document.
    pub fn pointer_down(&mut self, point: Point) -> PointerOutcome {
        let hit = self.canvas.document.top_shape_at(point);
        self.pointer_down_with_hit(point, hit)
    }

    /// Handle a click whose hit-test was done by the surface.
    pub fn pointer_down_with_hit(&mut self, point: Point, hit: Option<ShapeId>) -> PointerOutcome {
        let previous = self.canvas.selection();
        let outcome = self.canvas.handle_pointer_down(point, hit);

        match outcome {
            PointerOutcome::Created(id) => {
                log::info!("Created {} at ({}, {})", self.kind_name(id), point.x, point.y);
                self.emit(EditorEvent::ShapeAdded(id));
                self.surface.request_repaint();
            }
            PointerOutcome::Selected(id) => {
                log::debug!("Selected {id}");
            }
            PointerOutcome::Deselected => {
                log::debug!("Click on empty canvas");
            }
        }
        if self.canvas.selection() != previous {
            self.surface.request_repaint();
        }
        self.selection_changed_from(previous);
        outcome
    }

    fn kind_name(&self, id: ShapeId) -> &'static str {
        self.canvas
            .document
            .get_shape(id)
            .map(|s| s.kind().name())
            .unwrap_or("shape")
    }

    /// Handle a key press. Returns the action taken, if the key was bound.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<ShortcutAction> {
        let action = ShortcutAction::from_key_event(event)?;
        match action {
            ShortcutAction::SetTool(tool) => self.set_tool(tool),
            ShortcutAction::DeleteSelected => {
                self.delete_selected();
            }
            ShortcutAction::ClearSelection => self.clear_selection(),
        }
        Some(action)
    }

    /// Select a shape by ID. Unknown IDs are ignored.
    pub fn select(&mut self, id: ShapeId) -> bool {
        let previous = self.canvas.selection();
        let selected = self.canvas.select(id);
        if selected && previous != Some(id) {
            self.surface.request_repaint();
        }
        self.selection_changed_from(previous);
        selected
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        let previous = self.canvas.selection();
        self.canvas.clear_selection();
        if previous.is_some() {
            self.surface.request_repaint();
        }
        self.selection_changed_from(previous);
    }

    /// Write one attribute onto the selected shape.
    pub fn edit_property(&mut self, edit: PropertyEdit) -> EditOutcome {
        let outcome = self.properties.apply(&mut self.canvas, edit);
        if let EditOutcome::Applied(id) = outcome {
            self.emit(EditorEvent::ShapeUpdated(id));
            self.surface.on_shape_changed(id);
        }
        outcome
    }

    /// Parse a raw form value and write it onto the selected shape.
    pub fn edit_property_str(&mut self, name: &str, value: &str) -> Result<EditOutcome, PropertyError> {
        let edit = PropertyEdit::parse(name, value)?;
        Ok(self.edit_property(edit))
    }

    /// Delete the selected shape.
    pub fn delete_selected(&mut self) -> Option<ShapeId> {
        let previous = self.canvas.selection();
        let removed = self.canvas.delete_selected();
        if let Some(id) = removed {
            log::info!("Deleted {id}");
            self.emit(EditorEvent::ShapeRemoved(id));
            self.notice("Object deleted");
            self.surface.request_repaint();
        }
        self.selection_changed_from(previous);
        removed
    }

    /// Duplicate the selected shape and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<ShapeId> {
        let previous = self.canvas.selection();
        let Some(source) = previous else {
            log::debug!("Nothing selected to duplicate");
            return None;
        };

        let Some(copy) = self.canvas.duplicate_shape(source) else {
            log::warn!("Duplicate failed: shape {source} no longer exists");
            return None;
        };
        self.canvas.select(copy);
        log::info!("Duplicated {source} as {copy}");
        self.emit(EditorEvent::ShapeAdded(copy));
        self.notice("Object duplicated");
        self.surface.request_repaint();
        self.selection_changed_from(previous);
        Some(copy)
    }

    /// Remove every shape and restore the configured background.
    pub fn clear_canvas(&mut self) {
        let previous = self.canvas.selection();
        self.canvas.clear(self.config.background);
        log::info!("Canvas cleared");
        self.emit(EditorEvent::CanvasCleared);
        self.notice("Canvas cleared");
        self.surface
            .resize(self.canvas.document.size, self.canvas.document.background);
        self.surface.request_repaint();
        self.selection_changed_from(previous);
    }

    /// Change the canvas dimensions without touching shapes.
    ///
    /// Sizes that fail [`config::validate_canvas_size`] leave the canvas as it was.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        if let Err(e) = config::validate_canvas_size(width, height) {
            log::warn!("Ignoring canvas size: {e}");
            return Err(e);
        }
        let size = Size::new(width, height);
        self.canvas.document.set_size(size);
        self.surface.resize(size, self.canvas.document.background);
        self.surface.request_repaint();
        self.emit(EditorEvent::CanvasResized(size));
        Ok(())
    }

    /// Change the canvas background without touching shapes.
    pub fn set_background(&mut self, color: SerializableColor) {
        self.canvas.document.set_background(color);
        self.surface.resize(self.canvas.document.size, color);
        self.surface.request_repaint();
        self.emit(EditorEvent::BackgroundChanged(color));
    }

    /// Encode the canvas through the surface.
    pub fn export(&mut self, format: ExportFormat) -> SurfaceResult<Vec<u8>> {
        match self.surface.export(&self.canvas.document, format) {
            Ok(bytes) => {
                log::info!("Exported {} ({} bytes)", format, bytes.len());
                self.notice(format!("Canvas exported as {}", format.extension().to_uppercase()));
                Ok(bytes)
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                Err(e)
            }
        }
    }
}

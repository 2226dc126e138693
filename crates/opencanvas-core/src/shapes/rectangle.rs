//! Rectangle shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Width of a rectangle placed by a single click.
    pub const DEFAULT_WIDTH: f64 = 100.0;
    /// Height of a rectangle placed by a single click.
    pub const DEFAULT_HEIGHT: f64 = 50.0;

    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Create a default-sized rectangle centered on `center`, styled with the
    /// toolbar defaults.
    pub fn centered_at(center: Point) -> Self {
        let position = Point::new(
            center.x - Self::DEFAULT_WIDTH / 2.0,
            center.y - Self::DEFAULT_HEIGHT / 2.0,
        );
        let mut rect = Self::new(position, Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT);
        rect.style = Self::default_style();
        rect
    }

    /// Blue fill with a dark blue outline.
    pub fn default_style() -> ShapeStyle {
        ShapeStyle {
            fill_color: Some(SerializableColor::rgb(0x3b, 0x82, 0xf6)),
            stroke_color: Some(SerializableColor::rgb(0x1e, 0x3a, 0x8a)),
            stroke_width: 2.0,
        }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        let half_sw = self.style.half_stroke();
        if self.style.fill_color.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance + half_sw, tolerance + half_sw)
                .contains(point)
        } else {
            // Outline only: hit on the border
            let outer = rect.inflate(tolerance + half_sw, tolerance + half_sw);
            let inner = rect.inflate(-(tolerance + half_sw), -(tolerance + half_sw));
            outer.contains(point) && !inner.contains(point)
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

//! Ellipse shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circular ellipse, positioned by the top-left corner of its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Radius.
    pub radius: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Radius of an ellipse placed by a single click.
    pub const DEFAULT_RADIUS: f64 = 35.0;

    /// Create a new ellipse.
    pub fn new(position: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            radius,
            style: ShapeStyle::default(),
        }
    }

    /// Create a default-sized ellipse centered on `center`, styled with the
    /// toolbar defaults.
    pub fn centered_at(center: Point) -> Self {
        let r = Self::DEFAULT_RADIUS;
        let mut ellipse = Self::new(Point::new(center.x - r, center.y - r), r);
        ellipse.style = Self::default_style();
        ellipse
    }

    /// Red fill with a dark red outline.
    pub fn default_style() -> ShapeStyle {
        ShapeStyle {
            fill_color: Some(SerializableColor::rgb(0xef, 0x44, 0x44)),
            stroke_color: Some(SerializableColor::rgb(0x99, 0x1b, 0x1b)),
            stroke_width: 2.0,
        }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.radius, self.position.y + self.radius)
    }
}

impl ShapeTrait for Ellipse {
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
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + 2.0 * self.radius,
            self.position.y + 2.0 * self.radius,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let half_sw = self.style.half_stroke();
        let distance = self.center().distance(point);
        if distance > self.radius + tolerance + half_sw {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside inner circle
        let inner = self.radius - tolerance - half_sw;
        inner < f64::EPSILON || distance >= inner
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_creation() {
        let ellipse = Ellipse::new(Point::new(50.0, 50.0), 30.0);
        assert!((ellipse.center().x - 80.0).abs() < f64::EPSILON);
        assert!((ellipse.center().y - 80.0).abs() < f64::EPSILON);
        assert!((ellipse.radius - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_centered_at() {
        let ellipse = Ellipse::centered_at(Point::new(100.0, 100.0));
        assert!((ellipse.position.x - 65.0).abs() < f64::EPSILON);
        assert!((ellipse.position.y - 65.0).abs() < f64::EPSILON);
        assert!((ellipse.radius - 35.0).abs() < f64::EPSILON);
        assert!((ellipse.style.stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_center() {
        let ellipse = Ellipse::centered_at(Point::new(50.0, 50.0));
        assert!(ellipse.hit_test(Point::new(50.0, 50.0), 0.0));
    }

    #[test]
    fn test_hit_test_edge() {
        let mut circle = Ellipse::new(Point::new(-10.0, -10.0), 10.0);
        circle.style.stroke_color = None;
        circle.style.fill_color = Some(SerializableColor::black());
        assert!(circle.hit_test(Point::new(10.0, 0.0), 0.0));
        assert!(!circle.hit_test(Point::new(15.0, 0.0), 0.0));
    }

    #[test]
    fn test_bounds() {
        let ellipse = Ellipse::new(Point::new(20.0, 30.0), 30.0);
        let bounds = ellipse.bounds();
        assert!((bounds.x0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 30.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 80.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 90.0).abs() < f64::EPSILON);
    }
}

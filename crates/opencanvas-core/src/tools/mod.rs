//! Tool system for the canvas.

use crate::shapes::{Ellipse, Rectangle, Shape, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    #[serde(alias = "rect")]
    Rectangle,
    #[serde(alias = "circle")]
    Ellipse,
    Text,
}

/// A tool name that matches no [`ToolKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl ToolKind {
    /// Toolbar label. The ellipse tool places circles and is shown as such.
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Circle",
            ToolKind::Text => "Text",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(ToolKind::Select),
            "rectangle" | "rect" => Ok(ToolKind::Rectangle),
            // The toolbar calls this tool "circle"
            "ellipse" | "circle" => Ok(ToolKind::Ellipse),
            "text" => Ok(ToolKind::Text),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

/// Tracks the active tool and turns canvas clicks into new shapes.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Returns the previous tool.
    pub fn set_tool(&mut self, tool: ToolKind) -> ToolKind {
        std::mem::replace(&mut self.current_tool, tool)
    }

    /// Build the shape the current tool places at `point`.
    ///
    /// Rectangles and ellipses are centered on the click; text boxes start at
    /// it. The select tool never creates anything.
    pub fn create_shape_at(&self, point: Point) -> Option<Shape> {
        match self.current_tool {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(Shape::Rectangle(Rectangle::centered_at(point))),
            ToolKind::Ellipse => Some(Shape::Ellipse(Ellipse::centered_at(point))),
            ToolKind::Text => Some(Shape::Text(Text::placeholder_at(point))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Select);

        let previous = tm.set_tool(ToolKind::Rectangle);
        assert_eq!(previous, ToolKind::Select);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_select_tool_no_shape() {
        let tm = ToolManager::new();
        assert!(tm.create_shape_at(Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_creation_per_tool() {
        let mut tm = ToolManager::new();
        let click = Point::new(300.0, 200.0);

        tm.set_tool(ToolKind::Rectangle);
        let shape = tm.create_shape_at(click).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.position(), Point::new(250.0, 175.0));

        tm.set_tool(ToolKind::Ellipse);
        let shape = tm.create_shape_at(click).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Ellipse);
        assert_eq!(shape.position(), Point::new(265.0, 165.0));

        tm.set_tool(ToolKind::Text);
        let shape = tm.create_shape_at(click).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Text);
        assert_eq!(shape.position(), click);
    }

    #[test]
    fn test_tool_from_str() {
        assert_eq!("circle".parse::<ToolKind>(), Ok(ToolKind::Ellipse));
        assert_eq!("Rectangle".parse::<ToolKind>(), Ok(ToolKind::Rectangle));
        assert_eq!("pan".parse::<ToolKind>(), Err(UnknownTool("pan".to_string())));
    }

    #[test]
    fn test_unknown_tool_is_error() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownTool("pan".to_string()));
        assert_eq!(err.to_string(), "Unknown tool: pan");
    }

    #[test]
    fn test_circle_label() {
        assert_eq!(ToolKind::Ellipse.label(), "Circle");
        assert_eq!(ToolKind::Ellipse.to_string(), "Circle");
    }
}

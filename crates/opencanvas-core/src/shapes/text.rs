//! Text shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    Georgia,
    TimesNewRoman,
    Helvetica,
    CourierNew,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Georgia => "Georgia",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::CourierNew => "Courier New",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Arial,
            FontFamily::Georgia,
            FontFamily::TimesNewRoman,
            FontFamily::Helvetica,
            FontFamily::CourierNew,
        ]
    }

    /// Average glyph advance as a fraction of the font size.
    fn char_width_factor(&self) -> f64 {
        match self {
            FontFamily::Arial | FontFamily::Helvetica => 0.52,
            FontFamily::Georgia => 0.55,
            FontFamily::TimesNewRoman => 0.48,
            FontFamily::CourierNew => 0.60,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a family name is not one of [`FontFamily::all`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown font family: {0}")]
pub struct UnknownFontFamily(pub String);

impl FromStr for FontFamily {
    type Err = UnknownFontFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FontFamily::all()
            .iter()
            .copied()
            .find(|family| family.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFontFamily(trimmed.to_string()))
    }
}

/// A wrapping text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family.
    pub font_family: FontFamily,
    /// Bounding width; lines wrap at this width.
    pub width: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    /// Default bounding width.
    pub const DEFAULT_WIDTH: f64 = 200.0;
    /// Content of a freshly placed text box.
    pub const PLACEHOLDER: &'static str = "Type here...";
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT: f64 = 1.16;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            width: Self::DEFAULT_WIDTH,
            style: Self::default_style(),
        }
    }

    /// Create a placeholder text box whose top-left corner is `position`.
    pub fn placeholder_at(position: Point) -> Self {
        Self::new(position, Self::PLACEHOLDER.to_string())
    }

    /// Black fill, no outline.
    pub fn default_style() -> ShapeStyle {
        ShapeStyle {
            fill_color: Some(SerializableColor::black()),
            stroke_color: None,
            stroke_width: 1.0,
        }
    }

    /// Create a new text shape with font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Approximate number of rendered lines after wrapping at `width`.
    pub fn line_count(&self) -> usize {
        let char_width = self.font_size * self.font_family.char_width_factor();
        let per_line = if char_width > 0.0 {
            ((self.width / char_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut count = 0;
        for line in self.content.split('\n') {
            let chars = line.chars().count();
            count += chars.div_ceil(per_line).max(1);
        }
        count
    }

    /// Approximate height based on font size and wrapped line count.
    pub fn height(&self) -> f64 {
        self.line_count() as f64 * self.font_size * Self::LINE_HEIGHT
    }
}

impl ShapeTrait for Text {
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
            self.position.x + self.width,
            self.position.y + self.height(),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let bounds = self.bounds().inflate(tolerance, tolerance);
        bounds.contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

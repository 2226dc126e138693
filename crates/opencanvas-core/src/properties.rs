//! Properties panel model: reads the selected shape into an editable
//! snapshot and writes single-attribute edits back onto the canvas.

use crate::canvas::Canvas;
use crate::shapes::{FontFamily, SerializableColor, Shape, ShapeId, ShapeKind, ShapeUpdate};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Stroke widths offered by the panel.
pub const STROKE_WIDTH_RANGE: RangeInclusive<f64> = 0.0..=20.0;
/// Font sizes offered by the panel.
pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 8.0..=72.0;

/// Errors from turning raw form input into a [`PropertyEdit`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),
    #[error("Invalid color for {property}: {value}")]
    InvalidColor { property: PropertyName, value: String },
    #[error("Invalid number for {property}: {value}")]
    InvalidNumber { property: PropertyName, value: String },
    #[error("{property} must be between {min} and {max}, got {value}")]
    OutOfRange {
        property: PropertyName,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Unknown font family: {0}")]
    UnknownFontFamily(String),
}

/// Editable attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyName {
    Fill,
    Stroke,
    StrokeWidth,
    Text,
    FontSize,
    FontFamily,
}

impl PropertyName {
    /// Whether the attribute exists on shapes of `kind`.
    pub fn applies_to(&self, kind: ShapeKind) -> bool {
        match self {
            PropertyName::Fill | PropertyName::Stroke | PropertyName::StrokeWidth => true,
            PropertyName::Text | PropertyName::FontSize | PropertyName::FontFamily => {
                kind == ShapeKind::Text
            }
        }
    }

    /// Form field name.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyName::Fill => "fill",
            PropertyName::Stroke => "stroke",
            PropertyName::StrokeWidth => "strokeWidth",
            PropertyName::Text => "text",
            PropertyName::FontSize => "fontSize",
            PropertyName::FontFamily => "fontFamily",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyName {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fill" => Ok(PropertyName::Fill),
            "stroke" => Ok(PropertyName::Stroke),
            "strokeWidth" | "stroke_width" => Ok(PropertyName::StrokeWidth),
            "text" => Ok(PropertyName::Text),
            "fontSize" | "font_size" => Ok(PropertyName::FontSize),
            "fontFamily" | "font_family" => Ok(PropertyName::FontFamily),
            other => Err(PropertyError::UnknownProperty(other.to_string())),
        }
    }
}

/// A single-attribute edit coming from the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Fill(SerializableColor),
    Stroke(SerializableColor),
    StrokeWidth(f64),
    Text(String),
    FontSize(f64),
    FontFamily(FontFamily),
}

impl PropertyEdit {
    /// The attribute this edit targets.
    pub fn property(&self) -> PropertyName {
        match self {
            PropertyEdit::Fill(_) => PropertyName::Fill,
            PropertyEdit::Stroke(_) => PropertyName::Stroke,
            PropertyEdit::StrokeWidth(_) => PropertyName::StrokeWidth,
            PropertyEdit::Text(_) => PropertyName::Text,
            PropertyEdit::FontSize(_) => PropertyName::FontSize,
            PropertyEdit::FontFamily(_) => PropertyName::FontFamily,
        }
    }

    /// Coerce a raw form value into a validated edit.
    pub fn parse(name: &str, value: &str) -> Result<Self, PropertyError> {
        let property: PropertyName = name.parse()?;
        match property {
            PropertyName::Fill => parse_color(property, value).map(PropertyEdit::Fill),
            PropertyName::Stroke => parse_color(property, value).map(PropertyEdit::Stroke),
            PropertyName::StrokeWidth => {
                parse_number(property, value, STROKE_WIDTH_RANGE).map(PropertyEdit::StrokeWidth)
            }
            PropertyName::Text => Ok(PropertyEdit::Text(value.to_string())),
            PropertyName::FontSize => {
                parse_number(property, value, FONT_SIZE_RANGE).map(PropertyEdit::FontSize)
            }
            PropertyName::FontFamily => value
                .parse::<FontFamily>()
                .map(PropertyEdit::FontFamily)
                .map_err(|e| PropertyError::UnknownFontFamily(e.0)),
        }
    }
}

impl From<PropertyEdit> for ShapeUpdate {
    fn from(edit: PropertyEdit) -> Self {
        let update = ShapeUpdate::new();
        match edit {
            PropertyEdit::Fill(color) => update.with_fill(Some(color)),
            PropertyEdit::Stroke(color) => update.with_stroke(Some(color)),
            PropertyEdit::StrokeWidth(width) => update.with_stroke_width(width),
            PropertyEdit::Text(content) => update.with_content(content),
            PropertyEdit::FontSize(size) => update.with_font_size(size),
            PropertyEdit::FontFamily(family) => update.with_font_family(family),
        }
    }
}

fn parse_color(property: PropertyName, value: &str) -> Result<SerializableColor, PropertyError> {
    SerializableColor::from_hex(value).ok_or_else(|| PropertyError::InvalidColor {
        property,
        value: value.to_string(),
    })
}

fn parse_number(
    property: PropertyName,
    value: &str,
    range: RangeInclusive<f64>,
) -> Result<f64, PropertyError> {
    let number: f64 = value
        .trim()
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| PropertyError::InvalidNumber {
            property,
            value: value.to_string(),
        })?;
    if !range.contains(&number) {
        return Err(PropertyError::OutOfRange {
            property,
            value: number,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(number)
}

/// Text-only attributes shown for text boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextProperties {
    pub text: String,
    pub font_size: f64,
    pub font_family: FontFamily,
}

/// Displayable attributes of one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySnapshot {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    /// Present only for text boxes.
    pub text: Option<TextProperties>,
}

impl PropertySnapshot {
    pub fn from_shape(shape: &Shape) -> Self {
        let style = shape.style();
        Self {
            id: shape.id(),
            kind: shape.kind(),
            fill: style.fill_color,
            stroke: style.stroke_color,
            stroke_width: style.stroke_width,
            text: shape.as_text().map(|t| TextProperties {
                text: t.content.clone(),
                font_size: t.font_size,
                font_family: t.font_family,
            }),
        }
    }

    /// Fields the panel should render, in display order.
    pub fn visible_properties(&self) -> Vec<PropertyName> {
        let mut fields = Vec::new();
        if self.fill.is_some() {
            fields.push(PropertyName::Fill);
        }
        if self.stroke.is_some() {
            fields.push(PropertyName::Stroke);
        }
        fields.push(PropertyName::StrokeWidth);
        if self.text.is_some() {
            fields.extend([
                PropertyName::Text,
                PropertyName::FontSize,
                PropertyName::FontFamily,
            ]);
        }
        fields
    }
}

/// What the panel shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum PropertyPanel {
    /// Nothing selected; the panel shows a placeholder.
    #[default]
    Empty,
    Shape(PropertySnapshot),
}

impl PropertyPanel {
    pub fn snapshot(&self) -> Option<&PropertySnapshot> {
        match self {
            PropertyPanel::Empty => None,
            PropertyPanel::Shape(snapshot) => Some(snapshot),
        }
    }
}

/// Result of writing an edit back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The selected shape changed.
    Applied(ShapeId),
    /// The value was already set.
    Unchanged(ShapeId),
    /// The attribute does not exist on the selected shape's variant.
    NotApplicable(ShapeKind),
    /// Nothing is selected.
    NoSelection,
}

/// Keeps the panel in step with the canvas selection.
#[derive(Debug, Clone, Default)]
pub struct PropertiesBridge {
    panel: PropertyPanel,
}

impl PropertiesBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current panel contents.
    pub fn panel(&self) -> &PropertyPanel {
        &self.panel
    }

    /// Re-derive the panel from the canvas selection.
    pub fn sync(&mut self, canvas: &Canvas) -> &PropertyPanel {
        self.panel = match canvas.selected_shape() {
            Some(shape) => PropertyPanel::Shape(PropertySnapshot::from_shape(shape)),
            None => PropertyPanel::Empty,
        };
        &self.panel
    }

    /// Write one attribute onto the selected shape.
    pub fn apply(&mut self, canvas: &mut Canvas, edit: PropertyEdit) -> EditOutcome {
        let Some(shape) = canvas.selected_shape() else {
            return EditOutcome::NoSelection;
        };
        let (id, kind) = (shape.id(), shape.kind());

        let property = edit.property();
        if !property.applies_to(kind) {
            log::debug!("Ignoring {property} edit on {kind}");
            return EditOutcome::NotApplicable(kind);
        }

        let changed = canvas.update_shape(id, &edit.into());
        self.sync(canvas);
        if changed {
            EditOutcome::Applied(id)
        } else {
            EditOutcome::Unchanged(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Rectangle, Text};
    use kurbo::Point;

    fn canvas_with(shape: Shape) -> (Canvas, ShapeId) {
        let mut canvas = Canvas::new();
        let id = canvas.add_shape(shape);
        canvas.select(id);
        (canvas, id)
    }

    #[test]
    fn test_snapshot_rectangle_hides_text_fields() {
        let shape = Shape::Rectangle(Rectangle::centered_at(Point::new(0.0, 0.0)));
        let snapshot = PropertySnapshot::from_shape(&shape);

        assert_eq!(snapshot.kind, ShapeKind::Rectangle);
        assert!(snapshot.text.is_none());
        assert_eq!(
            snapshot.visible_properties(),
            vec![PropertyName::Fill, PropertyName::Stroke, PropertyName::StrokeWidth]
        );
    }

    #[test]
    fn test_snapshot_text_shows_text_fields() {
        let shape = Shape::Text(Text::placeholder_at(Point::new(0.0, 0.0)));
        let snapshot = PropertySnapshot::from_shape(&shape);

        let text = snapshot.text.as_ref().unwrap();
        assert_eq!(text.text, Text::PLACEHOLDER);
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
        // Text boxes have no stroke, so the stroke field is hidden
        assert_eq!(
            snapshot.visible_properties(),
            vec![
                PropertyName::Fill,
                PropertyName::StrokeWidth,
                PropertyName::Text,
                PropertyName::FontSize,
                PropertyName::FontFamily,
            ]
        );
    }

    #[test]
    fn test_sync_follows_selection() {
        let (mut canvas, id) = canvas_with(Shape::Ellipse(Ellipse::centered_at(Point::ZERO)));
        let mut bridge = PropertiesBridge::new();

        let panel = bridge.sync(&canvas);
        assert_eq!(panel.snapshot().map(|s| s.id), Some(id));

        canvas.clear_selection();
        assert_eq!(*bridge.sync(&canvas), PropertyPanel::Empty);
    }

    #[test]
    fn test_apply_fill() {
        let (mut canvas, id) = canvas_with(Shape::Rectangle(Rectangle::centered_at(Point::ZERO)));
        let mut bridge = PropertiesBridge::new();

        let red = SerializableColor::rgb(255, 0, 0);
        assert_eq!(bridge.apply(&mut canvas, PropertyEdit::Fill(red)), EditOutcome::Applied(id));
        assert_eq!(canvas.selected_shape().unwrap().style().fill_color, Some(red));
        assert_eq!(bridge.panel().snapshot().unwrap().fill, Some(red));

        assert_eq!(bridge.apply(&mut canvas, PropertyEdit::Fill(red)), EditOutcome::Unchanged(id));
    }

    #[test]
    fn test_apply_text_on_rectangle_is_ignored() {
        let (mut canvas, _) = canvas_with(Shape::Rectangle(Rectangle::centered_at(Point::ZERO)));
        let before = canvas.selected_shape().cloned();
        let mut bridge = PropertiesBridge::new();

        let outcome = bridge.apply(&mut canvas, PropertyEdit::Text("hi".to_string()));
        assert_eq!(outcome, EditOutcome::NotApplicable(ShapeKind::Rectangle));
        assert_eq!(canvas.selected_shape().cloned(), before);
    }

    #[test]
    fn test_apply_without_selection() {
        let mut canvas = Canvas::new();
        let mut bridge = PropertiesBridge::new();
        assert_eq!(
            bridge.apply(&mut canvas, PropertyEdit::StrokeWidth(3.0)),
            EditOutcome::NoSelection
        );
    }

    #[test]
    fn test_apply_font_family() {
        let (mut canvas, id) = canvas_with(Shape::Text(Text::placeholder_at(Point::ZERO)));
        let mut bridge = PropertiesBridge::new();

        let outcome = bridge.apply(&mut canvas, PropertyEdit::FontFamily(FontFamily::Georgia));
        assert_eq!(outcome, EditOutcome::Applied(id));
        let text = canvas.selected_shape().and_then(Shape::as_text).unwrap();
        assert_eq!(text.font_family, FontFamily::Georgia);
    }

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            PropertyEdit::parse("fill", "#ff0000"),
            Ok(PropertyEdit::Fill(SerializableColor::rgb(255, 0, 0)))
        );
        assert_eq!(
            PropertyEdit::parse("strokeWidth", " 4 "),
            Ok(PropertyEdit::StrokeWidth(4.0))
        );
        assert_eq!(
            PropertyEdit::parse("font_family", "Times New Roman"),
            Ok(PropertyEdit::FontFamily(FontFamily::TimesNewRoman))
        );
        assert_eq!(
            PropertyEdit::parse("text", "  spaced  "),
            Ok(PropertyEdit::Text("  spaced  ".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            PropertyEdit::parse("opacity", "1"),
            Err(PropertyError::UnknownProperty(_))
        ));
        assert!(matches!(
            PropertyEdit::parse("stroke", "blue"),
            Err(PropertyError::InvalidColor { .. })
        ));
        assert!(matches!(
            PropertyEdit::parse("fontSize", "big"),
            Err(PropertyError::InvalidNumber { .. })
        ));
        assert!(matches!(
            PropertyEdit::parse("fontSize", "100"),
            Err(PropertyError::OutOfRange { .. })
        ));
        assert!(matches!(
            PropertyEdit::parse("strokeWidth", "NaN"),
            Err(PropertyError::InvalidNumber { .. })
        ));
        assert!(matches!(
            PropertyEdit::parse("fontFamily", "Papyrus"),
            Err(PropertyError::UnknownFontFamily(_))
        ));
    }
}

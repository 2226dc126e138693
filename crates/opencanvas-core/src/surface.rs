//! Contract between the editor and whatever paints the canvas.

use crate::canvas::CanvasDocument;
use crate::shapes::{SerializableColor, ShapeId};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Canvas has no area: {0}x{1}")]
    EmptySurface(u32, u32),
    #[error("Canvas too large to render: {0}x{1}")]
    TooLarge(f64, f64),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Image formats the editor can ask the surface to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            other => Err(SurfaceError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// The rendering collaborator.
///
/// The editor owns the scene; implementations only paint it. Repaint
/// requests are fire-and-forget and may be coalesced.
pub trait RenderSurface {
    /// Ask for the canvas to be repainted.
    fn request_repaint(&mut self);

    /// A shape's attributes changed.
    fn on_shape_changed(&mut self, _id: ShapeId) {
        self.request_repaint();
    }

    /// The canvas dimensions or background changed.
    fn resize(&mut self, size: Size, background: SerializableColor);

    /// Encode the current canvas as an image.
    fn export(&mut self, document: &CanvasDocument, format: ExportFormat) -> SurfaceResult<Vec<u8>>;
}

/// Surface that paints nothing and records what it was asked to do.
///
/// Useful for tests and for driving the editor without a display.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    /// Number of repaint requests received.
    pub repaints: usize,
    /// Shapes reported as changed, in order.
    pub changed: Vec<ShapeId>,
    /// Last size and background passed to [`RenderSurface::resize`].
    pub last_resize: Option<(Size, SerializableColor)>,
    /// Formats requested through [`RenderSurface::export`].
    pub exports: Vec<ExportFormat>,
}

impl RecordingSurface {
    /// Create a new recording surface.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSurface for RecordingSurface {
    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn on_shape_changed(&mut self, id: ShapeId) {
        self.changed.push(id);
        self.request_repaint();
    }

    fn resize(&mut self, size: Size, background: SerializableColor) {
        self.last_resize = Some((size, background));
    }

    fn export(&mut self, document: &CanvasDocument, format: ExportFormat) -> SurfaceResult<Vec<u8>> {
        self.exports.push(format);
        document
            .to_json()
            .map(String::into_bytes)
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }
}

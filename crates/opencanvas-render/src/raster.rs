//! CPU raster surface.

use image::{ImageFormat, Rgba, RgbaImage};
use kurbo::{Point, Rect, Size};
use opencanvas_core::canvas::CanvasDocument;
use opencanvas_core::config::MAX_CANVAS_DIMENSION;
use opencanvas_core::shapes::{SerializableColor, Shape, ShapeStyle, ShapeTrait};
use opencanvas_core::surface::{ExportFormat, RenderSurface, SurfaceError, SurfaceResult};
use peniko::Color;
use std::io::Cursor;

/// Render surface that paints the scene into an RGBA buffer.
///
/// Shapes are sampled at pixel centers without antialiasing. Text boxes are
/// not rasterized.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    size: Size,
    background: SerializableColor,
    dirty: bool,
    repaint_requests: usize,
    frame: Option<RgbaImage>,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    /// Create a surface with the default 800x600 white canvas.
    pub fn new() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            background: SerializableColor::white(),
            dirty: true,
            repaint_requests: 0,
            frame: None,
        }
    }

    /// Size the surface was last told about.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn background(&self) -> SerializableColor {
        self.background
    }

    /// Whether a repaint was requested since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Total repaint requests received.
    pub fn repaint_requests(&self) -> usize {
        self.repaint_requests
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    /// Paint `document` into a fresh frame.
    ///
    /// The document's own size and background win over whatever the surface
    /// was last resized to.
    pub fn render(&mut self, document: &CanvasDocument) -> SurfaceResult<&RgbaImage> {
        let (width, height) = pixel_size(document.size)?;
        if document.size != self.size {
            log::debug!(
                "Surface size {}x{} differs from document, using document size",
                self.size.width,
                self.size.height
            );
        }

        let mut image = RgbaImage::from_pixel(width, height, Rgba(rgba(document.background.into())));
        for shape in document.shapes_ordered() {
            paint_shape(&mut image, shape);
        }

        self.dirty = false;
        let frame: &RgbaImage = self.frame.insert(image);
        Ok(frame)
    }
}

impl RenderSurface for RasterSurface {
    fn request_repaint(&mut self) {
        self.dirty = true;
        self.repaint_requests += 1;
    }

    fn resize(&mut self, size: Size, background: SerializableColor) {
        log::debug!("Surface resized to {}x{} ({})", size.width, size.height, background);
        self.size = size;
        self.background = background;
        self.frame = None;
        self.dirty = true;
    }

    fn export(&mut self, document: &CanvasDocument, format: ExportFormat) -> SurfaceResult<Vec<u8>> {
        let frame = self.render(document)?;
        let mut bytes = Cursor::new(Vec::new());
        let result = match format {
            ExportFormat::Png => frame.write_to(&mut bytes, ImageFormat::Png),
            // JPEG has no alpha channel
            ExportFormat::Jpeg => image::DynamicImage::ImageRgba8(frame.clone())
                .to_rgb8()
                .write_to(&mut bytes, ImageFormat::Jpeg),
        };
        result.map_err(|e| SurfaceError::Encode(e.to_string()))?;
        Ok(bytes.into_inner())
    }
}

fn pixel_size(size: Size) -> SurfaceResult<(u32, u32)> {
    if size.width > MAX_CANVAS_DIMENSION || size.height > MAX_CANVAS_DIMENSION {
        return Err(SurfaceError::TooLarge(size.width, size.height));
    }
    let clamp = |v: f64| if v.is_finite() && v > 0.0 { v.round() as u32 } else { 0 };
    let (width, height) = (clamp(size.width), clamp(size.height));
    if width == 0 || height == 0 {
        return Err(SurfaceError::EmptySurface(width, height));
    }
    // RGBA8 buffer length must fit in memory addressing
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(SurfaceError::TooLarge(size.width, size.height))?;
    Ok((width, height))
}

fn rgba(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

/// Source-over blend of `src` onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let alpha = u32::from(src[3]);
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        *dst = Rgba(src);
        return;
    }
    let inv = 255 - alpha;
    for i in 0..3 {
        let mixed = u32::from(src[i]) * alpha + u32::from(dst.0[i]) * inv;
        dst.0[i] = ((mixed + 127) / 255) as u8;
    }
    let out_alpha = alpha + (u32::from(dst.0[3]) * inv + 127) / 255;
    dst.0[3] = out_alpha.min(255) as u8;
}

/// Pixel coverage of a shape's fill and stroke.
enum Coverage {
    Rect(Rect),
    Circle { center: Point, radius: f64 },
}

impl Coverage {
    fn fill_contains(&self, p: Point) -> bool {
        match self {
            Coverage::Rect(rect) => rect.contains(p),
            Coverage::Circle { center, radius } => p.distance(*center) <= *radius,
        }
    }

    fn stroke_contains(&self, p: Point, half: f64) -> bool {
        match self {
            Coverage::Rect(rect) => {
                rect.inflate(half, half).contains(p) && !rect.inflate(-half, -half).contains(p)
            }
            Coverage::Circle { center, radius } => (p.distance(*center) - radius).abs() <= half,
        }
    }
}

fn paint_shape(image: &mut RgbaImage, shape: &Shape) {
    let coverage = match shape {
        Shape::Rectangle(rect) => Coverage::Rect(rect.as_rect()),
        Shape::Ellipse(ellipse) => Coverage::Circle {
            center: ellipse.center(),
            radius: ellipse.radius,
        },
        Shape::Text(text) => {
            log::debug!("Skipping glyph rasterization for text {}", text.id());
            return;
        }
    };

    let style: &ShapeStyle = shape.style();
    let fill = style.fill().map(rgba);
    let half = style.half_stroke();
    let stroke = style.stroke().filter(|_| half > 0.0).map(rgba);
    if fill.is_none() && stroke.is_none() {
        return;
    }

    let area = shape.bounds().inflate(half, half);
    let x0 = area.x0.floor().max(0.0) as u32;
    let y0 = area.y0.floor().max(0.0) as u32;
    let x1 = (area.x1.ceil().max(0.0) as u32).min(image.width());
    let y1 = (area.y1.ceil().max(0.0) as u32).min(image.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let sample = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let pixel = image.get_pixel_mut(x, y);
            if let Some(color) = fill.filter(|_| coverage.fill_contains(sample)) {
                blend(pixel, color);
            }
            if let Some(color) = stroke.filter(|_| coverage.stroke_contains(sample, half)) {
                blend(pixel, color);
            }
        }
    }
}

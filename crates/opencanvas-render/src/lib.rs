//! OpenCanvas Render Library
//!
//! Render surfaces for OpenCanvas. The default implementation rasterizes the
//! scene on the CPU and encodes exports with the `image` crate.

mod raster;

pub use raster::RasterSurface;

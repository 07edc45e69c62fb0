//! # Rendering Module
//!
//! Everything between a decoded payload and printable dots.
//!
//! ## Modules
//!
//! - [`rasterize`]: PDF/image pages to a single grayscale column
//! - [`surface`]: Background rendering with a bounded readiness wait
//! - [`dither`]: Grayscale to packed 1-bit rows

pub mod dither;
pub mod rasterize;
pub mod surface;

pub use dither::{Dithering, Raster};
pub use rasterize::RasterizeOptions;
pub use surface::{Content, Surface, SurfaceState};

//! Development of Bayer RAW data into RGB rasters
//!
//! One decoded RAW image can be developed several times with different
//! parameters, e.g. a gamma-encoded 8-bit sRGB rendition and a linear 16-bit
//! wide-gamut rendition.

pub mod color;
mod developer;
mod cpu_developer;
pub mod types;

pub use color::GammaCurve;
pub use developer::RawDeveloper;
pub use cpu_developer::CpuDeveloper;
pub use types::{DevelopParams, DevelopedImage, OutputColorSpace, OutputDepth, PixelData, WhiteBalance};

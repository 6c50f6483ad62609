//! JPEG writing module
//!
//! Writes 8-bit RGB renditions as baseline JPEG.

mod writer;
mod standard_jpeg_writer;

pub use writer::JpegWriter;
pub use standard_jpeg_writer::StandardJpegWriter;

/// Quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

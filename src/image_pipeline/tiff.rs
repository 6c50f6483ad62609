//! TIFF writing module
//!
//! Writes 16-bit RGB renditions as TIFF with a choice of compression.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::TiffCompression;

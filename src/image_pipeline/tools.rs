//! External tool adapters
//!
//! The pixel-format transcoder (ffmpeg) and the Ultra HDR encoder
//! (ultrahdr_app) run as child processes through a [`ToolRunner`], so the
//! pipeline can be driven without the binaries installed.

mod runner;
mod transcoder;
mod ultrahdr;

pub use runner::{SystemToolRunner, ToolOutput, ToolRunner};
pub use transcoder::PixelTranscoder;
pub use ultrahdr::{EncodeParameters, UltraHdrEncoder};

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::tools::runner::{tool_name, ToolRunner};

/// Encoding scenario: raw HDR intent plus compressed SDR intent.
pub const ENCODE_MODE_HDR_RAW_SDR_COMPRESSED: u8 = 0;

/// ultrahdr_app colour format code for half-float RGBA.
pub const HDR_FORMAT_RGBA_HALF_FLOAT: u8 = 4;

/// ultrahdr_app colour transfer code for linear data.
pub const COLOR_TRANSFER_LINEAR: u8 = 0;

/// Inputs of one ultrahdr_app invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParameters {
    pub hdr_raw: PathBuf,
    pub sdr: PathBuf,
    pub width: usize,
    pub height: usize,
    pub hdr_pixel_format: u8,
    pub color_transfer: u8,
    pub output: PathBuf,
}

impl EncodeParameters {
    /// Half-float linear HDR buffer plus JPEG SDR image.
    pub fn linear_half_float(
        hdr_raw: impl Into<PathBuf>,
        sdr: impl Into<PathBuf>,
        (width, height): (usize, usize),
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hdr_raw: hdr_raw.into(),
            sdr: sdr.into(),
            width,
            height,
            hdr_pixel_format: HDR_FORMAT_RGBA_HALF_FLOAT,
            color_transfer: COLOR_TRANSFER_LINEAR,
            output: output.into(),
        }
    }
}

/// Runs libultrahdr's `ultrahdr_app` to produce the final Ultra HDR file.
#[derive(Debug, Clone)]
pub struct UltraHdrEncoder {
    program: PathBuf,
}

impl UltraHdrEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn args(&self, params: &EncodeParameters) -> Vec<OsString> {
        vec![
            "-m".into(),
            ENCODE_MODE_HDR_RAW_SDR_COMPRESSED.to_string().into(),
            "-p".into(),
            params.hdr_raw.clone().into(),
            "-i".into(),
            params.sdr.clone().into(),
            "-w".into(),
            params.width.to_string().into(),
            "-h".into(),
            params.height.to_string().into(),
            "-a".into(),
            params.hdr_pixel_format.to_string().into(),
            "-t".into(),
            params.color_transfer.to_string().into(),
            "-z".into(),
            params.output.clone().into(),
        ]
    }

    /// Returns the encoder's captured stdout on success.
    pub fn encode<R: ToolRunner + ?Sized>(&self, runner: &R, params: &EncodeParameters) -> Result<String> {
        info!("Encoding to Ultra HDR...");
        let result = runner
            .run(&self.program, &self.args(params))?
            .check(&tool_name(&self.program), true)?;
        info!("Ultra HDR encoding complete.");
        Ok(result.stdout)
    }
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::tools::runner::{tool_name, ToolRunner};

/// Headerless 16-bit-per-channel RGBA, little endian.
pub const RAW_PIXEL_FORMAT: &str = "rgba64le";

/// Converts the HDR TIFF into a headerless RGBA buffer with ffmpeg.
#[derive(Debug, Clone)]
pub struct PixelTranscoder {
    program: PathBuf,
}

impl PixelTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
        args.extend(
            ["-f", "image2", "-pix_fmt", RAW_PIXEL_FORMAT, "-vcodec", "rawvideo", "-y"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(output.into());
        args
    }

    pub fn transcode<R: ToolRunner + ?Sized>(&self, runner: &R, input: &Path, output: &Path) -> Result<()> {
        info!("Converting HDR TIFF to {}...", output.display());
        let result = runner
            .run(&self.program, &self.args(input, output))?
            .check(&tool_name(&self.program), false)?;
        debug!(stderr = %result.stderr.trim(), "Transcoder finished");
        info!("Conversion to raw complete.");
        Ok(())
    }
}

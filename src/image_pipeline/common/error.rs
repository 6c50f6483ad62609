use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Input file not found at {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to develop RAW image: {0}")]
    DevelopError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Rendition dimensions differ: SDR {sdr:?}, HDR {hdr:?}")]
    DimensionMismatch {
        sdr: (usize, usize),
        hdr: (usize, usize),
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Intermediate file missing or empty: {}", .0.display())]
    MissingIntermediate(PathBuf),

    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConversionError {
    /// Text captured from a failed subprocess, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ConversionError::ToolFailed { stderr: Some(text), .. } if !text.trim().is_empty() => {
                Some(text.as_str())
            }
            _ => None,
        }
    }

    /// Everything except a missing input is a failure of the processing stages.
    pub fn is_processing(&self) -> bool {
        !matches!(self, ConversionError::InputNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

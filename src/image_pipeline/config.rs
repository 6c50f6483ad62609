//! Conversion configuration

use std::path::PathBuf;

use crate::image_pipeline::jpeg::DEFAULT_JPEG_QUALITY;
use crate::image_pipeline::tiff::TiffCompression;

/// Where libultrahdr's build leaves the sample encoder app.
pub const DEFAULT_ULTRAHDR_APP: &str = "./libultrahdr/build/ultrahdr_app";

/// Resolved through `PATH` unless configured.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Configuration for RAW to Ultra HDR conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Ultra HDR encoder executable
    pub ultrahdr_app: PathBuf,
    /// ffmpeg executable used for the pixel-format conversion
    pub ffmpeg: PathBuf,
    /// Directory for intermediate files; the working directory when `None`
    pub intermediate_dir: Option<PathBuf>,
    /// Leave intermediate files on disk after the run
    pub keep_intermediates: bool,
    /// Quality of the SDR JPEG (1-100)
    pub jpeg_quality: u8,
    /// Compression of the HDR TIFF
    pub tiff_compression: TiffCompression,
    /// Whether to validate image dimensions before development
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            ultrahdr_app: PathBuf::from(DEFAULT_ULTRAHDR_APP),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            intermediate_dir: None,
            keep_intermediates: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            tiff_compression: TiffCompression::None,
            validate_dimensions: true,
            max_dimension: Some(50000),
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    ultrahdr_app: Option<PathBuf>,
    ffmpeg: Option<PathBuf>,
    intermediate_dir: Option<Option<PathBuf>>,
    keep_intermediates: Option<bool>,
    jpeg_quality: Option<u8>,
    tiff_compression: Option<TiffCompression>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl ConversionConfigBuilder {
    pub fn ultrahdr_app(mut self, path: impl Into<PathBuf>) -> Self {
        self.ultrahdr_app = Some(path.into());
        self
    }

    pub fn ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg = Some(path.into());
        self
    }

    pub fn intermediate_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.intermediate_dir = Some(dir);
        self
    }

    pub fn keep_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = Some(keep);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            ultrahdr_app: self.ultrahdr_app.unwrap_or(default.ultrahdr_app),
            ffmpeg: self.ffmpeg.unwrap_or(default.ffmpeg),
            intermediate_dir: self.intermediate_dir.unwrap_or(default.intermediate_dir),
            keep_intermediates: self.keep_intermediates.unwrap_or(default.keep_intermediates),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tool_layout() {
        let config = ConversionConfig::default();
        assert_eq!(config.ultrahdr_app, PathBuf::from("./libultrahdr/build/ultrahdr_app"));
        assert_eq!(config.ffmpeg, PathBuf::from("ffmpeg"));
        assert!(config.intermediate_dir.is_none());
        assert!(!config.keep_intermediates);
        assert_eq!(config.jpeg_quality, 75);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = ConversionConfig::builder()
            .ultrahdr_app("/opt/libultrahdr/ultrahdr_app")
            .keep_intermediates(true)
            .tiff_compression(TiffCompression::DeflateFast)
            .max_dimension(None)
            .build();

        assert_eq!(config.ultrahdr_app, PathBuf::from("/opt/libultrahdr/ultrahdr_app"));
        assert_eq!(config.ffmpeg, PathBuf::from(DEFAULT_FFMPEG));
        assert!(config.keep_intermediates);
        assert_eq!(config.tiff_compression, TiffCompression::DeflateFast);
        assert_eq!(config.max_dimension, None);
        assert!(config.validate_dimensions);
    }
}

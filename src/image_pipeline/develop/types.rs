//! Types for RAW development

use crate::image_pipeline::develop::color::{GammaCurve, XYZ_TO_PROPHOTO, XYZ_TO_SRGB};

/// Bits per channel of a developed raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDepth {
    Eight,
    Sixteen,
}

impl OutputDepth {
    pub fn bits(self) -> u32 {
        match self {
            OutputDepth::Eight => 8,
            OutputDepth::Sixteen => 16,
        }
    }
}

/// RGB primaries of a developed raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColorSpace {
    /// sRGB / BT.709 primaries, D65
    Srgb,
    /// ProPhoto (ROMM) primaries, D50
    ProPhoto,
}

impl OutputColorSpace {
    pub fn xyz_to_rgb(self) -> &'static [[f32; 3]; 3] {
        match self {
            OutputColorSpace::Srgb => &XYZ_TO_SRGB,
            OutputColorSpace::ProPhoto => &XYZ_TO_PROPHOTO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteBalance {
    /// As-shot multipliers recorded by the camera
    Camera,
    /// No white balance
    Unity,
}

/// Parameters for one development of a RAW image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevelopParams {
    pub depth: OutputDepth,
    pub gamma: GammaCurve,
    pub white_balance: WhiteBalance,
    pub color_space: OutputColorSpace,
    /// Fraction of pixels allowed to clip when auto-brightening; `None` disables it
    pub auto_bright: Option<f32>,
}

/// Default clipping fraction for auto-brightness.
pub const AUTO_BRIGHT_THRESHOLD: f32 = 0.01;

impl DevelopParams {
    /// 8-bit sRGB with a camera-style (2.4, 12.92) gamma curve.
    pub fn sdr() -> Self {
        Self {
            depth: OutputDepth::Eight,
            gamma: GammaCurve::new(2.4, 12.92),
            white_balance: WhiteBalance::Camera,
            color_space: OutputColorSpace::Srgb,
            auto_bright: Some(AUTO_BRIGHT_THRESHOLD),
        }
    }

    /// 16-bit linear ProPhoto.
    pub fn hdr_linear() -> Self {
        Self {
            depth: OutputDepth::Sixteen,
            gamma: GammaCurve::linear(),
            white_balance: WhiteBalance::Camera,
            color_space: OutputColorSpace::ProPhoto,
            auto_bright: Some(AUTO_BRIGHT_THRESHOLD),
        }
    }
}

/// Interleaved RGB samples of a developed raster
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    Eight(Vec<u8>),
    Sixteen(Vec<u16>),
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            PixelData::Eight(v) => v.len(),
            PixelData::Sixteen(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RGB raster produced by developing a RAW image
#[derive(Debug, Clone)]
pub struct DevelopedImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    pub color_space: OutputColorSpace,
    pub gamma: GammaCurve,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: PixelData,
}

impl DevelopedImage {
    pub fn depth(&self) -> OutputDepth {
        match self.data {
            PixelData::Eight(_) => OutputDepth::Eight,
            PixelData::Sixteen(_) => OutputDepth::Sixteen,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

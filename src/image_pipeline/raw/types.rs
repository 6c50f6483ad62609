//! RAW image data types

/// 2x2 colour filter arrangement, named by the colours of the top-left quad
/// read row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

impl BayerPattern {
    /// Builds the pattern from the four colour indices (0 = R, 1 = G, 2 = B)
    /// at (0,0), (0,1), (1,0), (1,1).
    pub fn from_quad(quad: [usize; 4]) -> Option<Self> {
        match quad {
            [0, 1, 1, 2] => Some(BayerPattern::Rggb),
            [2, 1, 1, 0] => Some(BayerPattern::Bggr),
            [1, 0, 2, 1] => Some(BayerPattern::Grbg),
            [1, 2, 0, 1] => Some(BayerPattern::Gbrg),
            _ => None,
        }
    }
}

/// Represents decoded RAW sensor data, cropped to the visible area
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw pixel data (single channel Bayer pattern)
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// Colour filter arrangement at the top-left of `data`
    pub pattern: BayerPattern,
    pub black_level: u16,
    pub white_level: u16,
    /// As-shot white balance multipliers (R, G, B, E); NaN when unknown
    pub wb_coeffs: [f32; 4],
    /// Camera to XYZ (D65) matrix
    pub cam_to_xyz: [[f32; 4]; 3],
}

use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::develop::color::camera_to_output;
use crate::image_pipeline::develop::developer::RawDeveloper;
use crate::image_pipeline::develop::types::{
    DevelopParams, DevelopedImage, OutputDepth, PixelData, WhiteBalance,
};
use crate::image_pipeline::raw::types::{BayerPattern, RawImageData};

/// Histogram resolution used to find the auto-brightness white point.
const HISTOGRAM_BINS: usize = 8192;

/// Lowest bin the white point search may stop at.
const MIN_WHITE_BIN: usize = 32;

/// Develops Bayer data on the CPU: bilinear demosaic, black/white level,
/// white balance, colour matrix, auto-brightness, tone curve, quantisation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuDeveloper;

impl CpuDeveloper {
    pub fn new() -> Self {
        Self
    }

    fn demosaic(&self, raw_image: &RawImageData) -> Result<Vec<u16>> {
        let width = raw_image.width;
        let height = raw_image.height;

        let bayer_bytes: Vec<u8> = raw_image.data.iter().flat_map(|&val| val.to_le_bytes()).collect();
        let mut output_buf = vec![0u8; width * height * 3 * 2];
        let mut cursor = Cursor::new(&bayer_bytes[..]);

        debug!(
            "Running demosaic with CFA={:?}, algo=Linear, input bytes {}",
            raw_image.pattern,
            bayer_bytes.len()
        );

        let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
        bayer::run_demosaic(
            &mut cursor,
            BayerDepth::Depth16LE,
            bayer_cfa(raw_image.pattern),
            Demosaic::Linear,
            &mut output_raster,
        )
        .map_err(|e| ConversionError::DevelopError(format!("demosaic failed: {:?}", e)))?;

        // bayer writes the 16-bit raster in native byte order
        Ok(output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect())
    }
}

impl RawDeveloper for CpuDeveloper {
    fn develop(&self, raw_image: &RawImageData, params: &DevelopParams) -> Result<DevelopedImage> {
        let width = raw_image.width;
        let height = raw_image.height;
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        if raw_image.data.len() != width * height {
            return Err(ConversionError::DevelopError(format!(
                "{} samples for a {}x{} image",
                raw_image.data.len(),
                width,
                height
            )));
        }

        info!(
            "Developing {}x{} image: {}-bit, {:?}, gamma {:?}",
            width,
            height,
            params.depth.bits(),
            params.color_space,
            params.gamma.pair()
        );

        let rgb = self.demosaic(raw_image)?;

        let black_level = raw_image.black_level as f32;
        let white_level = if raw_image.white_level > raw_image.black_level {
            raw_image.white_level as f32
        } else {
            ((1u32 << raw_image.bits_per_sample) - 1) as f32
        };
        let range = (white_level - black_level).max(1.0);
        let wb = white_balance_multipliers(raw_image, params.white_balance);
        let matrix = output_matrix(raw_image, params);

        let to_linear = |pixel: &[u16]| -> [f32; 3] {
            let cam = [
                (pixel[0] as f32 - black_level).max(0.0) / range * wb[0],
                (pixel[1] as f32 - black_level).max(0.0) / range * wb[1],
                (pixel[2] as f32 - black_level).max(0.0) / range * wb[2],
            ];
            [
                matrix[0][0] * cam[0] + matrix[0][1] * cam[1] + matrix[0][2] * cam[2],
                matrix[1][0] * cam[0] + matrix[1][1] * cam[1] + matrix[1][2] * cam[2],
                matrix[2][0] * cam[0] + matrix[2][1] * cam[1] + matrix[2][2] * cam[2],
            ]
        };

        let scale = match params.auto_bright {
            Some(threshold) => auto_bright_scale(rgb.chunks_exact(3).map(to_linear), width * height, threshold),
            None => 1.0,
        };
        debug!("Brightness scale: {:.4}", scale);

        let encode = |v: f32| params.gamma.apply((v * scale).clamp(0.0, 1.0));
        let data = match params.depth {
            OutputDepth::Eight => PixelData::Eight(
                rgb.chunks_exact(3)
                    .flat_map(|px| to_linear(px).map(|v| (encode(v) * 255.0).round() as u8))
                    .collect(),
            ),
            OutputDepth::Sixteen => PixelData::Sixteen(
                rgb.chunks_exact(3)
                    .flat_map(|px| to_linear(px).map(|v| (encode(v) * 65535.0).round() as u16))
                    .collect(),
            ),
        };

        Ok(DevelopedImage {
            width,
            height,
            color_space: params.color_space,
            gamma: params.gamma,
            data,
        })
    }
}

fn bayer_cfa(pattern: BayerPattern) -> CFA {
    match pattern {
        BayerPattern::Rggb => CFA::RGGB,
        BayerPattern::Bggr => CFA::BGGR,
        BayerPattern::Grbg => CFA::GRBG,
        BayerPattern::Gbrg => CFA::GBRG,
    }
}

/// Per-channel multipliers normalised to green.
fn white_balance_multipliers(raw_image: &RawImageData, mode: WhiteBalance) -> [f32; 3] {
    match mode {
        WhiteBalance::Unity => [1.0; 3],
        WhiteBalance::Camera => {
            let [r, g, b, _] = raw_image.wb_coeffs;
            if [r, g, b].iter().any(|c| !c.is_finite() || *c <= 0.0) {
                warn!("No usable camera white balance, developing without it");
                return [1.0; 3];
            }
            [r / g, 1.0, b / g]
        }
    }
}

fn output_matrix(raw_image: &RawImageData, params: &DevelopParams) -> [[f32; 3]; 3] {
    let known = raw_image
        .cam_to_xyz
        .iter()
        .any(|row| row[..3].iter().any(|v| v.abs() > f32::EPSILON));
    if !known {
        warn!("No colour matrix for this camera, keeping camera RGB");
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    camera_to_output(params.color_space.xyz_to_rgb(), &raw_image.cam_to_xyz)
}

/// Scale that lets `threshold` of the pixels clip in their brightest channel.
fn auto_bright_scale(pixels: impl Iterator<Item = [f32; 3]>, pixel_count: usize, threshold: f32) -> f32 {
    let mut histogram = vec![[0usize; 3]; HISTOGRAM_BINS];
    for pixel in pixels {
        for (c, v) in pixel.into_iter().enumerate() {
            let bin = ((v.clamp(0.0, 1.0) * HISTOGRAM_BINS as f32) as usize).min(HISTOGRAM_BINS - 1);
            histogram[bin][c] += 1;
        }
    }

    let allowed = (pixel_count as f32 * threshold) as usize;
    let mut white = MIN_WHITE_BIN;
    for c in 0..3 {
        let mut total = 0;
        let mut bin = HISTOGRAM_BINS - 1;
        while bin > MIN_WHITE_BIN {
            total += histogram[bin][c];
            if total > allowed {
                break;
            }
            bin -= 1;
        }
        white = white.max(bin);
    }
    HISTOGRAM_BINS as f32 / (white + 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::develop::color::GammaCurve;
    use crate::image_pipeline::develop::types::OutputColorSpace;

    const IDENTITY_CAM: [[f32; 4]; 3] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ];

    fn flat_raw(width: usize, height: usize, value: u16) -> RawImageData {
        RawImageData {
            width,
            height,
            data: vec![value; width * height],
            bits_per_sample: 14,
            pattern: BayerPattern::Rggb,
            black_level: 512,
            white_level: 16383,
            wb_coeffs: [2.0, 1.0, 1.5, f32::NAN],
            cam_to_xyz: IDENTITY_CAM,
        }
    }

    #[test]
    fn sdr_preset_produces_8bit_rgb() {
        let raw = flat_raw(8, 6, 4000);
        let image = CpuDeveloper::new().develop(&raw, &DevelopParams::sdr()).unwrap();
        assert_eq!(image.dimensions(), (8, 6));
        assert_eq!(image.depth(), OutputDepth::Eight);
        assert_eq!(image.color_space, OutputColorSpace::Srgb);
        assert_eq!(image.data.len(), 8 * 6 * 3);
    }

    #[test]
    fn hdr_preset_produces_16bit_linear_prophoto() {
        let raw = flat_raw(8, 6, 4000);
        let image = CpuDeveloper::new().develop(&raw, &DevelopParams::hdr_linear()).unwrap();
        assert_eq!(image.depth(), OutputDepth::Sixteen);
        assert_eq!(image.color_space, OutputColorSpace::ProPhoto);
        assert!(image.gamma.is_linear());
        assert_eq!(image.data.len(), 8 * 6 * 3);
    }

    #[test]
    fn black_frame_stays_black() {
        let raw = flat_raw(4, 4, 512);
        let params = DevelopParams { auto_bright: None, ..DevelopParams::sdr() };
        let image = CpuDeveloper::new().develop(&raw, &params).unwrap();
        match image.data {
            PixelData::Eight(data) => assert!(data.iter().all(|&v| v == 0)),
            other => panic!("unexpected pixel data {:?}", other),
        }
    }

    #[test]
    fn saturated_frame_is_white_without_balance() {
        let raw = flat_raw(4, 4, 16383);
        let params = DevelopParams {
            depth: OutputDepth::Sixteen,
            gamma: GammaCurve::linear(),
            white_balance: WhiteBalance::Unity,
            color_space: OutputColorSpace::Srgb,
            auto_bright: None,
        };
        let image = CpuDeveloper::new().develop(&raw, &params).unwrap();
        match image.data {
            PixelData::Sixteen(data) => assert!(data.iter().all(|&v| v == u16::MAX)),
            other => panic!("unexpected pixel data {:?}", other),
        }
    }

    #[test]
    fn sample_count_mismatch_is_rejected() {
        let mut raw = flat_raw(4, 4, 1000);
        raw.data.truncate(10);
        let err = CpuDeveloper::new().develop(&raw, &DevelopParams::sdr()).unwrap_err();
        assert!(matches!(err, ConversionError::DevelopError(_)));
    }

    #[test]
    fn missing_camera_balance_falls_back_to_unity() {
        let mut raw = flat_raw(2, 2, 1000);
        raw.wb_coeffs = [f32::NAN; 4];
        assert_eq!(white_balance_multipliers(&raw, WhiteBalance::Camera), [1.0; 3]);
        raw.wb_coeffs = [2.0, 1.0, 1.5, f32::NAN];
        assert_eq!(white_balance_multipliers(&raw, WhiteBalance::Camera), [2.0, 1.0, 1.5]);
    }

    #[test]
    fn auto_bright_lifts_midtones_to_white() {
        let pixels = vec![[0.5f32, 0.5, 0.5]; 100];
        let scale = auto_bright_scale(pixels.into_iter(), 100, 0.01);
        assert!((scale * 0.5 - 1.0).abs() < 1e-3, "scale {}", scale);
    }

    #[test]
    fn auto_bright_ignores_clipping_fraction() {
        // 99 dark pixels and a single bright one within the 2% allowance
        let mut pixels = vec![[0.25f32, 0.25, 0.25]; 99];
        pixels.push([1.0, 1.0, 1.0]);
        let scale = auto_bright_scale(pixels.into_iter(), 100, 0.02);
        assert!((scale * 0.25 - 1.0).abs() < 1e-3, "scale {}", scale);
    }
}

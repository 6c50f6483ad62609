//! RAW image reader implementation using the rawloader library.
//!
//! Decodes the sensor plane of any Bayer RAW format rawloader understands (ARW,
//! NEF, CR2, DNG, ...), crops it to the visible area and collects the metadata
//! the developer needs for black level, white balance and colour conversion.

use std::io::Cursor;

use tracing::{debug, warn};
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{BayerPattern, RawImageData};
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
///
/// Only single-channel Bayer sensors are supported. X-Trans and linear
/// (already demosaiced) files are rejected with `UnsupportedFormat`.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use raw_ultrahdr_rs::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let image_data = RawLoaderReader.read_raw(&raw_bytes).unwrap();
    /// println!("{}x{}", image_data.width, image_data.height);
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        debug!(
            make = %decoded.clean_make,
            model = %decoded.clean_model,
            "Decoded image: {}x{} ({} cpp)",
            decoded.width,
            decoded.height,
            decoded.cpp
        );

        if decoded.cpp != 1 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} components per pixel, expected a single Bayer plane",
                decoded.cpp
            )));
        }

        // Integer data is cast directly, float data (normalized 0.0-1.0) is scaled to u16 range
        let plane: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values.iter().map(|&v| v as u16).collect(),
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v * u16::MAX as f32) as u16).collect()
            }
        };

        let (data, width, height) = crop_plane(&plane, decoded.width, decoded.height, decoded.crops)?;
        let [top, _, _, left] = decoded.crops;

        let cfa = decoded.cfa.shift(left, top);
        let quad = [
            cfa.color_at(0, 0),
            cfa.color_at(0, 1),
            cfa.color_at(1, 0),
            cfa.color_at(1, 1),
        ];
        let pattern = BayerPattern::from_quad(quad).ok_or_else(|| {
            ConversionError::UnsupportedFormat(format!("colour filter array {}", decoded.cfa.name))
        })?;

        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = bits_from_white_level(max_white_level);
        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);

        if decoded.wb_coeffs.iter().take(3).any(|c| c.is_nan()) {
            warn!("Camera white balance not recorded in file");
        }

        Ok(RawImageData {
            width,
            height,
            data,
            bits_per_sample,
            pattern,
            black_level: decoded.blacklevels[0],
            white_level: decoded.whitelevels[0],
            wb_coeffs: decoded.wb_coeffs,
            cam_to_xyz: decoded.cam_to_xyz(),
        })
    }
}

/// Minimum bits needed to represent the sensor's white level,
/// e.g. 4095 -> 12 bits, 16383 -> 14 bits.
pub(crate) fn bits_from_white_level(white_level: u16) -> u32 {
    if white_level == 0 {
        DEFAULT_BITS_PER_SAMPLE
    } else {
        U16_BITS - white_level.leading_zeros()
    }
}

/// Cuts the `[top, right, bottom, left]` margins off a row-major plane.
pub(crate) fn crop_plane(
    plane: &[u16],
    width: usize,
    height: usize,
    crops: [usize; 4],
) -> Result<(Vec<u16>, usize, usize)> {
    let [top, right, bottom, left] = crops;
    let out_width = width.saturating_sub(left + right);
    let out_height = height.saturating_sub(top + bottom);
    if out_width == 0 || out_height == 0 {
        return Err(ConversionError::InvalidDimensions(out_width, out_height));
    }
    if plane.len() < width * height {
        return Err(ConversionError::DecodeError(format!(
            "sensor plane holds {} samples, expected {}x{}",
            plane.len(),
            width,
            height
        )));
    }

    if out_width == width && out_height == height {
        return Ok((plane[..width * height].to_vec(), width, height));
    }

    let mut data = Vec::with_capacity(out_width * out_height);
    for row in plane.chunks_exact(width).skip(top).take(out_height) {
        data.extend_from_slice(&row[left..left + out_width]);
    }
    Ok((data, out_width, out_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_white_level() {
        assert_eq!(bits_from_white_level(4095), 12);
        assert_eq!(bits_from_white_level(16383), 14);
        assert_eq!(bits_from_white_level(u16::MAX), 16);
        assert_eq!(bits_from_white_level(0), DEFAULT_BITS_PER_SAMPLE);
    }

    #[test]
    fn crop_removes_margins() {
        // 4x3 plane, values encode (row, col)
        let plane: Vec<u16> = (0..3).flat_map(|r| (0..4).map(move |c| r * 10 + c)).collect();
        let (data, w, h) = crop_plane(&plane, 4, 3, [1, 1, 0, 1]).unwrap();
        assert_eq!((w, h), (2, 2));
        assert_eq!(data, vec![11, 12, 21, 22]);
    }

    #[test]
    fn crop_without_margins_is_identity() {
        let plane = vec![7u16; 6];
        let (data, w, h) = crop_plane(&plane, 3, 2, [0; 4]).unwrap();
        assert_eq!((w, h), (3, 2));
        assert_eq!(data, plane);
    }

    #[test]
    fn crop_to_nothing_is_rejected() {
        let plane = vec![0u16; 4];
        let err = crop_plane(&plane, 2, 2, [1, 0, 1, 0]).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDimensions(2, 0)));
    }

    #[test]
    fn garbage_input_fails_to_decode() {
        let err = RawLoaderReader.read_raw(b"definitely not a raw file").unwrap_err();
        assert!(matches!(err, ConversionError::DecodeError(_)));
    }

    #[test]
    fn bayer_quads_are_recognised() {
        assert_eq!(BayerPattern::from_quad([0, 1, 1, 2]), Some(BayerPattern::Rggb));
        assert_eq!(BayerPattern::from_quad([1, 2, 0, 1]), Some(BayerPattern::Gbrg));
        assert_eq!(BayerPattern::from_quad([0, 1, 3, 2]), None);
    }
}

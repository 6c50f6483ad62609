use std::io::Write;
use jpeg_encoder::{ColorType, Encoder};
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::develop::types::{DevelopedImage, PixelData};
use crate::image_pipeline::jpeg::writer::JpegWriter;

pub struct StandardJpegWriter;

impl JpegWriter for StandardJpegWriter {
    fn write_jpeg(&self, image: &DevelopedImage, output: &mut dyn Write, quality: u8) -> Result<()> {
        debug!("Encoding JPEG image: {}x{} at quality {}", image.width, image.height, quality);

        let PixelData::Eight(samples) = &image.data else {
            return Err(ConversionError::EncodeError(
                "JPEG intermediate expects 8-bit samples".to_string(),
            ));
        };

        let (Ok(width), Ok(height)) = (u16::try_from(image.width), u16::try_from(image.height)) else {
            return Err(ConversionError::EncodeError(format!(
                "{}x{} exceeds the JPEG size limit",
                image.width, image.height
            )));
        };

        let mut buffer = Vec::new();
        Encoder::new(&mut buffer, quality.clamp(1, 100))
            .encode(samples, width, height, ColorType::Rgb)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("JPEG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::develop::{GammaCurve, OutputColorSpace};

    fn rgb8(width: usize, height: usize) -> DevelopedImage {
        DevelopedImage {
            width,
            height,
            color_space: OutputColorSpace::Srgb,
            gamma: GammaCurve::new(2.4, 12.92),
            data: PixelData::Eight(vec![128; width * height * 3]),
        }
    }

    #[test]
    fn writes_jfif_stream() {
        let mut output = Vec::new();
        StandardJpegWriter.write_jpeg(&rgb8(16, 8), &mut output, 90).unwrap();
        assert_eq!(&output[..2], &[0xFF, 0xD8]);
        assert_eq!(&output[output.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn sixteen_bit_raster_is_rejected() {
        let image = DevelopedImage {
            data: PixelData::Sixteen(vec![0; 12]),
            ..rgb8(2, 2)
        };
        let err = StandardJpegWriter.write_jpeg(&image, &mut Vec::new(), 90).unwrap_err();
        assert!(matches!(err, ConversionError::EncodeError(_)));
    }

    #[test]
    fn oversized_raster_is_rejected() {
        let image = DevelopedImage {
            width: 70_000,
            height: 1,
            data: PixelData::Eight(Vec::new()),
            ..rgb8(1, 1)
        };
        let err = StandardJpegWriter.write_jpeg(&image, &mut Vec::new(), 90).unwrap_err();
        assert!(err.to_string().contains("70000x1"));
    }
}

use std::io::Write;
use tracing::debug;
use tiff::encoder::{colortype, compression::DeflateLevel, Compression, TiffEncoder};
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::develop::types::{DevelopedImage, PixelData};
use crate::image_pipeline::tiff::types::TiffCompression;
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(&self, image: &DevelopedImage, output: &mut dyn Write, compression: TiffCompression) -> Result<()> {
        debug!("Encoding RGB TIFF image: {}x{} ({:?})", image.width, image.height, compression);

        let PixelData::Sixteen(samples) = &image.data else {
            return Err(ConversionError::EncodeError(
                "TIFF intermediate expects 16-bit samples".to_string(),
            ));
        };

        let compression = match compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder.write_image::<colortype::RGB16>(
            image.width as u32,
            image.height as u32,
            samples,
        ).map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::develop::{GammaCurve, OutputColorSpace};

    fn rgb16(width: usize, height: usize) -> DevelopedImage {
        DevelopedImage {
            width,
            height,
            color_space: OutputColorSpace::ProPhoto,
            gamma: GammaCurve::linear(),
            data: PixelData::Sixteen((0..width * height * 3).map(|v| (v * 97) as u16).collect()),
        }
    }

    #[test]
    fn writes_readable_rgb16_tiff() {
        let mut output = Vec::new();
        StandardTiffWriter.write_tiff(&rgb16(5, 3), &mut output, TiffCompression::None).unwrap();

        let mut decoder = tiff::decoder::Decoder::new(std::io::Cursor::new(&output)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (5, 3));
        assert_eq!(decoder.colortype().unwrap(), tiff::ColorType::RGB(16));
    }

    #[test]
    fn compressed_output_is_written() {
        for compression in [TiffCompression::Lzw, TiffCompression::DeflateFast, TiffCompression::DeflateBest] {
            let mut output = Vec::new();
            StandardTiffWriter.write_tiff(&rgb16(16, 16), &mut output, compression).unwrap();
            assert!(!output.is_empty());
        }
    }

    #[test]
    fn eight_bit_raster_is_rejected() {
        let image = DevelopedImage {
            data: PixelData::Eight(vec![0; 12]),
            ..rgb16(2, 2)
        };
        let err = StandardTiffWriter.write_tiff(&image, &mut Vec::new(), TiffCompression::None).unwrap_err();
        assert!(matches!(err, ConversionError::EncodeError(_)));
    }
}

use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::develop::types::DevelopedImage;
use crate::image_pipeline::tiff::types::TiffCompression;

pub trait TiffWriter {
    fn write_tiff(&self, image: &DevelopedImage, output: &mut dyn Write, compression: TiffCompression) -> Result<()>;
}

use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::develop::types::DevelopedImage;

pub trait JpegWriter {
    fn write_jpeg(&self, image: &DevelopedImage, output: &mut dyn Write, quality: u8) -> Result<()>;
}

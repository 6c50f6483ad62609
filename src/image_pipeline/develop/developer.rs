use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::develop::types::{DevelopParams, DevelopedImage};
use crate::image_pipeline::raw::types::RawImageData;

pub trait RawDeveloper {
    fn develop(&self, raw_image: &RawImageData, params: &DevelopParams) -> Result<DevelopedImage>;
}

//! Image processing pipeline module
//!
//! This module provides a structured approach to turning a camera RAW file
//! into an Ultra HDR image, with separate modules for RAW reading,
//! development, intermediate writing, external tools and orchestration.

pub mod raw;
pub mod develop;
pub mod tiff;
pub mod jpeg;
pub mod tools;
pub mod intermediates;
pub mod config;
pub mod input;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    BayerPattern,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use develop::{
    CpuDeveloper,
    DevelopParams,
    DevelopedImage,
    GammaCurve,
    OutputColorSpace,
    OutputDepth,
    PixelData,
    RawDeveloper,
    WhiteBalance,
};

pub use self::tiff::{
    TiffCompression,
    TiffWriter,
    StandardTiffWriter,
};

pub use jpeg::{
    JpegWriter,
    StandardJpegWriter,
};

pub use tools::{
    EncodeParameters,
    PixelTranscoder,
    SystemToolRunner,
    ToolOutput,
    ToolRunner,
    UltraHdrEncoder,
};

pub use intermediates::{IntermediateFiles, IntermediateKind, IntermediatePaths};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use input::InputSpec;

pub use conversions::{
    ConversionReport,
    PipelineTimings,
    RawToUltraHdrPipeline,
    Stage,
};

//! Pipeline conversions module
//!
//! This module contains orchestration logic for the RAW to Ultra HDR conversion.

mod raw_to_ultrahdr;
mod timing;


pub use raw_to_ultrahdr::{ConversionReport, RawToUltraHdrPipeline};
pub use timing::{PipelineTimings, Stage, StepTiming, Timer};

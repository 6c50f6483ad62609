use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    config::ConversionConfig,
    conversions::timing::{PipelineTimings, Stage, Timer},
    develop::{CpuDeveloper, DevelopParams, RawDeveloper},
    input::InputSpec,
    intermediates::{IntermediateFiles, IntermediatePaths},
    jpeg::{JpegWriter, StandardJpegWriter},
    raw::{RawImageReader, RawLoaderReader},
    tiff::{StandardTiffWriter, TiffWriter},
    tools::{EncodeParameters, PixelTranscoder, SystemToolRunner, ToolRunner, UltraHdrEncoder},
};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub width: usize,
    pub height: usize,
    pub output: PathBuf,
    /// Captured stdout of the Ultra HDR encoder
    pub encoder_output: String,
    pub timings: PipelineTimings,
}

/// Decodes a RAW photo, develops an SDR and an HDR rendition, hands both to
/// the external encoder and removes the intermediates.
pub struct RawToUltraHdrPipeline<R: RawImageReader, X: ToolRunner, D: RawDeveloper> {
    reader: R,
    runner: X,
    developer: D,
    transcoder: PixelTranscoder,
    encoder: UltraHdrEncoder,
    config: ConversionConfig,
}

impl RawToUltraHdrPipeline<RawLoaderReader, SystemToolRunner, CpuDeveloper> {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_custom(RawLoaderReader, SystemToolRunner, CpuDeveloper::new(), config)
    }
}

impl<R: RawImageReader, X: ToolRunner, D: RawDeveloper> RawToUltraHdrPipeline<R, X, D> {
    pub fn with_custom(reader: R, runner: X, developer: D, config: ConversionConfig) -> Self {
        Self {
            reader,
            runner,
            developer,
            transcoder: PixelTranscoder::new(&config.ffmpeg),
            encoder: UltraHdrEncoder::new(&config.ultrahdr_app),
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Runs the whole conversion. Intermediates are cleaned up before this
    /// returns, whether the run succeeded or not.
    #[instrument(skip(self, spec), fields(input = %spec.input.display()))]
    pub fn run(&self, spec: &InputSpec) -> Result<ConversionReport> {
        spec.validate()?;

        let paths = IntermediatePaths::derive(&spec.input, self.config.intermediate_dir.as_deref())?;
        let keep = spec.keep_intermediates || self.config.keep_intermediates;
        let mut intermediates = IntermediateFiles::new(paths, keep);

        let result = self.process(spec, &intermediates);
        intermediates.cleanup();
        result
    }

    fn process(&self, spec: &InputSpec, intermediates: &IntermediateFiles) -> Result<ConversionReport> {
        let paths = intermediates.paths();
        let mut timings = PipelineTimings::new();

        info!("Processing {}...", spec.input.display());
        let timer = Timer::start(Stage::Decode);
        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            let input_data = std::fs::read(&spec.input).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", spec.input.display(), e))
            })?;
            self.reader.read_raw(&input_data)?
        };
        let (width, height) = (raw_image.width, raw_image.height);
        self.validate_dimensions(width, height)?;
        timer.stop(&mut timings);

        info!("Creating SDR image...");
        let sdr_dimensions = {
            let _span = tracing::info_span!("sdr_rendition").entered();
            let timer = Timer::start(Stage::DevelopSdr);
            let sdr = self.developer.develop(&raw_image, &DevelopParams::sdr())?;
            timer.stop(&mut timings);

            let timer = Timer::start(Stage::WriteSdr);
            write_intermediate(&paths.sdr, |out| {
                StandardJpegWriter.write_jpeg(&sdr, out, self.config.jpeg_quality)
            })?;
            timer.stop(&mut timings);
            sdr.dimensions()
        };
        info!("SDR image saved to {}", paths.sdr.display());

        info!("Creating HDR image (TIFF)...");
        let hdr_dimensions = {
            let _span = tracing::info_span!("hdr_rendition").entered();
            let timer = Timer::start(Stage::DevelopHdr);
            let hdr = self.developer.develop(&raw_image, &DevelopParams::hdr_linear())?;
            timer.stop(&mut timings);

            let timer = Timer::start(Stage::WriteHdr);
            write_intermediate(&paths.hdr_tiff, |out| {
                StandardTiffWriter.write_tiff(&hdr, out, self.config.tiff_compression)
            })?;
            timer.stop(&mut timings);
            hdr.dimensions()
        };
        info!("HDR TIFF image saved to {}", paths.hdr_tiff.display());
        drop(raw_image);

        if sdr_dimensions != hdr_dimensions || sdr_dimensions != (width, height) {
            return Err(ConversionError::DimensionMismatch {
                sdr: sdr_dimensions,
                hdr: hdr_dimensions,
            });
        }

        let timer = Timer::start(Stage::Transcode);
        {
            let _span = tracing::info_span!("transcode").entered();
            self.transcoder.transcode(&self.runner, &paths.hdr_tiff, &paths.hdr_raw)?;
        }
        timer.stop(&mut timings);

        intermediates.ensure_ready()?;

        let params = EncodeParameters::linear_half_float(&paths.hdr_raw, &paths.sdr, (width, height), &spec.output);
        let timer = Timer::start(Stage::Encode);
        let encoder_output = {
            let _span = tracing::info_span!("encode_ultrahdr").entered();
            self.encoder.encode(&self.runner, &params)?
        };
        timer.stop(&mut timings);
        info!("ultrahdr_app output: {}", encoder_output.trim_end());

        info!(
            width,
            height,
            output = %spec.output.display(),
            "Conversion complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        timings.log_summary();

        Ok(ConversionReport {
            width,
            height,
            output: spec.output.clone(),
            encoder_output,
            timings,
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.transcoder = PixelTranscoder::new(&config.ffmpeg);
        self.encoder = UltraHdrEncoder::new(&config.ultrahdr_app);
        self.config = config;
    }
}

/// Creates (or truncates) `path` and lets `write` fill it.
fn write_intermediate<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let mut file = File::create(path).map_err(|e| {
        ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
    })?;
    write(&mut file)?;
    file.sync_all()?;
    Ok(())
}

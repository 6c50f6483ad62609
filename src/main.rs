use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use raw_ultrahdr_rs::image_pipeline::{
    ConversionConfig, InputSpec, RawToUltraHdrPipeline, TiffCompression,
};
use raw_ultrahdr_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "raw_ultrahdr_rs")]
#[command(version, about = "Convert camera RAW files (e.g. Sony ARW) to Ultra HDR.", long_about = None)]
struct Cli {
    /// Path to the input RAW file
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Path to the output Ultra HDR file (.hif)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: PathBuf,

    /// Keep intermediate SDR and HDR files
    #[arg(long)]
    keep_intermediates: bool,

    /// Ultra HDR encoder executable
    #[arg(long, value_name = "PATH", env = "ULTRAHDR_APP", default_value = raw_ultrahdr_rs::image_pipeline::config::DEFAULT_ULTRAHDR_APP)]
    ultrahdr_app: PathBuf,

    /// ffmpeg executable
    #[arg(long, value_name = "PATH", env = "FFMPEG_PATH", default_value = raw_ultrahdr_rs::image_pipeline::config::DEFAULT_FFMPEG)]
    ffmpeg: PathBuf,

    /// Directory for intermediate files (defaults to the working directory)
    #[arg(long, value_name = "DIR")]
    intermediate_dir: Option<PathBuf>,

    /// Quality of the SDR JPEG
    #[arg(long, value_name = "1-100", default_value_t = 75, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Compression of the HDR TIFF
    #[arg(long, value_enum, default_value_t = TiffCompressionArg::None)]
    tiff_compression: TiffCompressionArg,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TiffCompressionArg {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<TiffCompressionArg> for TiffCompression {
    fn from(arg: TiffCompressionArg) -> Self {
        match arg {
            TiffCompressionArg::None => TiffCompression::None,
            TiffCompressionArg::Lzw => TiffCompression::Lzw,
            TiffCompressionArg::DeflateFast => TiffCompression::DeflateFast,
            TiffCompressionArg::DeflateBalanced => TiffCompression::DeflateBalanced,
            TiffCompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(if cli.verbose { "debug" } else { "info" });

    let spec = InputSpec::new(cli.input_file, cli.output_file, cli.keep_intermediates);
    spec.log();

    let config = ConversionConfig::builder()
        .ultrahdr_app(cli.ultrahdr_app)
        .ffmpeg(cli.ffmpeg)
        .intermediate_dir(cli.intermediate_dir)
        .keep_intermediates(cli.keep_intermediates)
        .jpeg_quality(cli.jpeg_quality)
        .tiff_compression(cli.tiff_compression.into())
        .build();
    let pipeline = RawToUltraHdrPipeline::new(config);

    match pipeline.run(&spec) {
        Ok(report) => {
            info!(
                "Ultra HDR image written to {} ({}x{})",
                report.output.display(),
                report.width,
                report.height
            );
            ExitCode::SUCCESS
        }
        Err(e) if !e.is_processing() => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("An error occurred: {}", e);
            if let Some(stderr) = e.stderr() {
                error!("Stderr: {}", stderr);
            }
            ExitCode::FAILURE
        }
    }
}

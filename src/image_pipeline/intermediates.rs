//! Intermediate files produced between pipeline stages
//!
//! All three paths are derived from the input's file stem before any stage
//! runs. [`IntermediateFiles`] owns them for the duration of a run and removes
//! whatever exists when it is dropped, unless retention was requested.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntermediateKind {
    /// JPEG of the SDR rendition
    SdrCompressed,
    /// 16-bit TIFF of the HDR rendition
    HdrTiff,
    /// Headerless RGBA buffer transcoded from the HDR TIFF
    HdrRaw,
}

impl IntermediateKind {
    pub const ALL: [IntermediateKind; 3] = [
        IntermediateKind::SdrCompressed,
        IntermediateKind::HdrTiff,
        IntermediateKind::HdrRaw,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            IntermediateKind::SdrCompressed => "_sdr.jpg",
            IntermediateKind::HdrTiff => "_hdr.tiff",
            IntermediateKind::HdrRaw => "_hdr.raw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediatePaths {
    pub sdr: PathBuf,
    pub hdr_tiff: PathBuf,
    pub hdr_raw: PathBuf,
}

impl IntermediatePaths {
    /// `<dir>/<stem>_sdr.jpg`, `<dir>/<stem>_hdr.tiff`, `<dir>/<stem>_hdr.raw`.
    /// Without a directory the paths are relative to the working directory.
    pub fn derive(input: &Path, dir: Option<&Path>) -> Result<Self> {
        let stem = input.file_stem().ok_or_else(|| {
            ConversionError::InputReadError(format!("{}: no file name", input.display()))
        })?;

        let path_for = |kind: IntermediateKind| {
            let mut name = stem.to_os_string();
            name.push(kind.suffix());
            match dir {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        };

        Ok(Self {
            sdr: path_for(IntermediateKind::SdrCompressed),
            hdr_tiff: path_for(IntermediateKind::HdrTiff),
            hdr_raw: path_for(IntermediateKind::HdrRaw),
        })
    }

    pub fn path(&self, kind: IntermediateKind) -> &Path {
        match kind {
            IntermediateKind::SdrCompressed => &self.sdr,
            IntermediateKind::HdrTiff => &self.hdr_tiff,
            IntermediateKind::HdrRaw => &self.hdr_raw,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntermediateKind, &Path)> {
        IntermediateKind::ALL.into_iter().map(move |kind| (kind, self.path(kind)))
    }
}

/// Cleanup guard over the intermediate files of one run.
#[derive(Debug)]
pub struct IntermediateFiles {
    paths: IntermediatePaths,
    keep: bool,
    cleaned: bool,
}

impl IntermediateFiles {
    pub fn new(paths: IntermediatePaths, keep: bool) -> Self {
        Self {
            paths,
            keep,
            cleaned: false,
        }
    }

    pub fn paths(&self) -> &IntermediatePaths {
        &self.paths
    }

    /// Checks that the encoder inputs exist and are not empty.
    pub fn ensure_ready(&self) -> Result<()> {
        for kind in [IntermediateKind::SdrCompressed, IntermediateKind::HdrRaw] {
            let path = self.paths.path(kind);
            match fs::metadata(path) {
                Ok(meta) if meta.is_file() && meta.len() > 0 => {}
                _ => return Err(ConversionError::MissingIntermediate(path.to_path_buf())),
            }
        }
        Ok(())
    }

    /// Removes existing intermediates unless retention was requested.
    /// Returns the number of files removed. Runs at most once.
    pub fn cleanup(&mut self) -> usize {
        if self.cleaned {
            return 0;
        }
        self.cleaned = true;

        if self.keep {
            info!("Keeping intermediate files");
            return 0;
        }

        info!("Cleaning up intermediate files...");
        let mut removed = 0;
        for (_, path) in self.paths.iter() {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => {
                    info!("Removed {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        removed
    }
}

impl Drop for IntermediateFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}

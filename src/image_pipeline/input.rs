//! Command-line inputs of one conversion run

use std::path::PathBuf;

use tracing::info;

use crate::image_pipeline::common::error::{ConversionError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub input: PathBuf,
    pub output: PathBuf,
    pub keep_intermediates: bool,
}

impl InputSpec {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, keep_intermediates: bool) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            keep_intermediates,
        }
    }

    /// Fails with `InputNotFound` when the input path does not exist.
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(ConversionError::InputNotFound(self.input.clone()));
        }
        Ok(())
    }

    pub fn log(&self) {
        info!("Input file: {}", self.input.display());
        info!("Output file: {}", self.output.display());
        info!("Keep intermediates: {}", self.keep_intermediates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_input_is_reported_with_path() {
        let spec = InputSpec::new("does/not/exist/missing.arw", "missing.hif", false);
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, ConversionError::InputNotFound(_)));
        assert!(err.to_string().contains("does/not/exist/missing.arw"));
    }

    #[test]
    fn existing_input_passes() {
        let file = NamedTempFile::new().unwrap();
        let spec = InputSpec::new(file.path(), "out.hif", true);
        assert!(spec.validate().is_ok());
    }
}

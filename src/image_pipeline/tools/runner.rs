use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Captured result of a finished child process
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Converts a non-zero exit into `ToolFailed`. The captured stderr is
    /// attached, or stdout when `stdout_fallback` is set and stderr is blank.
    pub(crate) fn check(self, tool: &str, stdout_fallback: bool) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        let captured = if self.stderr.trim().is_empty() && stdout_fallback {
            &self.stdout
        } else {
            &self.stderr
        };
        Err(ConversionError::ToolFailed {
            tool: tool.to_string(),
            code: self.code,
            stderr: (!captured.trim().is_empty()).then(|| captured.clone()),
        })
    }
}

/// Runs an external program to completion and captures its output.
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput>;
}

impl<T: ToolRunner + ?Sized> ToolRunner for &T {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput> {
        (**self).run(program, args)
    }
}

/// Runs tools as real child processes. Blocks until the child exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput> {
        debug!(program = %program.display(), ?args, "Spawning tool");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ConversionError::ToolLaunch {
                tool: tool_name(program),
                source,
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Short name of a tool for messages, e.g. `ffmpeg` for `/usr/bin/ffmpeg`.
pub(crate) fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_exit_carries_stderr() {
        let output = ToolOutput {
            code: Some(1),
            stdout: "progress".to_string(),
            stderr: "boom".to_string(),
        };
        let err = output.check("ffmpeg", false).unwrap_err();
        assert_eq!(err.stderr(), Some("boom"));
    }

    #[test]
    fn blank_stderr_falls_back_to_stdout_when_asked() {
        let output = ToolOutput {
            code: Some(2),
            stdout: "usage: ultrahdr_app ...".to_string(),
            stderr: String::new(),
        };
        let err = output.clone().check("ultrahdr_app", true).unwrap_err();
        assert_eq!(err.stderr(), Some("usage: ultrahdr_app ..."));

        let err = output.check("ultrahdr_app", false).unwrap_err();
        assert_eq!(err.stderr(), None);
    }

    #[test]
    fn success_passes_through() {
        let output = ToolOutput {
            code: Some(0),
            stdout: "done".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.check("ffmpeg", false).unwrap().stdout, "done");
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let err = SystemToolRunner
            .run(Path::new("/nonexistent/dir/no-such-tool"), &[])
            .unwrap_err();
        match err {
            ConversionError::ToolLaunch { tool, .. } => assert_eq!(tool, "no-such-tool"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn tool_name_uses_file_name() {
        assert_eq!(tool_name(Path::new("./libultrahdr/build/ultrahdr_app")), "ultrahdr_app");
        assert_eq!(tool_name(Path::new("ffmpeg")), "ffmpeg");
    }
}

//! Search backed by the `rg` binary.

use super::{split_nul_paths, Exclusions, OccurrenceSearch};
use crate::error::{Result, SweepError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Fixed-string search with ripgrep.
///
/// Hidden files are searched and ignore files are disabled so that untracked
/// and ignored-but-present files are treated the same as the other strategies
/// treat them. Binary detection is left to [`Exclusions::admits`].
#[derive(Debug, Clone)]
pub struct RipgrepSearch {
    program: PathBuf,
}

impl RipgrepSearch {
    /// Returns a ripgrep search if `rg` runs on this machine.
    pub fn detect() -> Option<Self> {
        Self::detect_program("rg")
    }

    /// Returns a ripgrep search using a specific binary, if it runs.
    pub fn detect_program(program: impl Into<PathBuf>) -> Option<Self> {
        let program = program.into();
        let status = Command::new(&program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()?;
        status.success().then_some(Self { program })
    }
}

impl OccurrenceSearch for RipgrepSearch {
    fn name(&self) -> &'static str {
        "ripgrep"
    }

    fn candidates(
        &self,
        root: &Path,
        needle: &str,
        exclusions: &Exclusions,
    ) -> Result<Vec<PathBuf>> {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(root)
            .stdin(Stdio::null())
            .args([
                "--files-with-matches",
                "--fixed-strings",
                "--hidden",
                "--no-ignore",
                "--no-messages",
                "--null",
                "--text",
            ]);
        cmd.args(exclusions.ripgrep_args());
        cmd.arg("-e").arg(needle).arg(".");

        let output = cmd.output().map_err(|e| SweepError::SearchFailed {
            tool: "rg".into(),
            message: e.to_string(),
        })?;

        // 0: matches, 1: no matches, anything else: error.
        match output.status.code() {
            Some(0) => Ok(split_nul_paths(&output.stdout)),
            Some(1) => Ok(Vec::new()),
            _ => Err(SweepError::SearchFailed {
                tool: "rg".into(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

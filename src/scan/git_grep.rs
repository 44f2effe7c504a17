//! Search backed by `git grep`.

use super::{split_nul_paths, Exclusions, OccurrenceSearch};
use crate::error::{Result, SweepError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Fixed-string search over tracked and untracked files with `git grep`.
///
/// Runs in text mode (`-a`); binary files are dropped afterwards by
/// [`Exclusions::admits`]. The root must be a git working tree.
#[derive(Debug, Clone)]
pub struct GitGrepSearch {
    program: PathBuf,
}

impl GitGrepSearch {
    /// Returns a git grep search if `git` runs on this machine.
    pub fn detect() -> Option<Self> {
        let program = PathBuf::from("git");
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

impl OccurrenceSearch for GitGrepSearch {
    fn name(&self) -> &'static str {
        "git-grep"
    }

    fn candidates(
        &self,
        root: &Path,
        needle: &str,
        exclusions: &Exclusions,
    ) -> Result<Vec<PathBuf>> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-C")
            .arg(root)
            .stdin(Stdio::null())
            .args([
                "-c",
                "core.quotePath=false",
                "grep",
                "--files-with-matches",
                "--fixed-strings",
                "--text",
                "-z",
                "--untracked",
                "--no-color",
                "-e",
            ])
            .arg(needle)
            .arg("--")
            .arg(".");
        cmd.args(exclusions.git_pathspecs());

        let output = cmd.output().map_err(|e| SweepError::SearchFailed {
            tool: "git grep".into(),
            message: e.to_string(),
        })?;

        match output.status.code() {
            Some(0) => Ok(split_nul_paths(&output.stdout)),
            Some(1) if output.stderr.is_empty() => Ok(Vec::new()),
            _ => Err(SweepError::SearchFailed {
                tool: "git grep".into(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

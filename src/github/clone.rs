//! Repository cloning operations.

use crate::error::{Result, SweepError};
use crate::git::GitAuth;
use git2::build::RepoBuilder;
use git2::{FetchOptions, Repository};
use std::path::Path;

/// Clones `url` into `target` with history truncated to the newest commit.
///
/// `target` must not exist or must be an empty directory.
pub fn clone_shallow(
    full_name: &str,
    url: &str,
    branch: &str,
    target: &Path,
    auth: &GitAuth,
) -> Result<Repository> {
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(auth.callbacks());
    fetch_options.depth(1);

    RepoBuilder::new()
        .branch(branch)
        .fetch_options(fetch_options)
        .clone(url, target)
        .map_err(|e| SweepError::CloneError {
            repo: full_name.to_string(),
            message: e.message().to_string(),
        })
}

/// Clones `url` into `target` with full history.
///
/// Used for filesystem remotes, which libgit2 cannot clone shallowly.
pub fn clone_full(full_name: &str, url: &str, branch: &str, target: &Path) -> Result<Repository> {
    RepoBuilder::new()
        .branch(branch)
        .clone(url, target)
        .map_err(|e| SweepError::CloneError {
            repo: full_name.to_string(),
            message: e.message().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clone_failure_names_repository() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.git");

        let Err(err) = clone_full(
            "org/missing",
            missing.to_str().unwrap(),
            "main",
            &dir.path().join("checkout"),
        ) else {
            panic!("cloning a missing remote should fail");
        };

        match err {
            SweepError::CloneError { repo, .. } => assert_eq!(repo, "org/missing"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

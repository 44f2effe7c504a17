//! Git push and fetch operations with authentication.

use crate::error::{Result, SweepError};
use crate::git::GitOps;
use git2::{FetchOptions, PushOptions};
use std::cell::RefCell;

/// Push operations for GitOps.
pub trait PushOps {
    /// Push a branch to a remote without force.
    fn push(&self, remote_name: &str, branch: &str) -> Result<()>;

    /// Push a branch and set it as upstream.
    fn push_with_upstream(&self, remote_name: &str, branch: &str) -> Result<()>;

    /// Fetch a single branch into its remote-tracking ref, shallowly.
    fn fetch_branch(&self, remote_name: &str, branch: &str) -> Result<()>;
}

impl PushOps for GitOps {
    fn push(&self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            SweepError::PushError {
                message: format!("Remote '{}' not found", remote_name),
            }
        })?;

        // No leading '+': the remote rejects anything but a fast-forward.
        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);

        let rejected: RefCell<Option<String>> = RefCell::new(None);
        {
            let mut callbacks = self.auth.callbacks();
            callbacks.push_update_reference(|refname, status| {
                if let Some(msg) = status {
                    *rejected.borrow_mut() = Some(format!("{} rejected: {}", refname, msg));
                }
                Ok(())
            });

            let mut push_options = PushOptions::new();
            push_options.remote_callbacks(callbacks);

            remote
                .push(&[&refspec], Some(&mut push_options))
                .map_err(|e| SweepError::PushError {
                    message: format!("Push failed: {}", e),
                })?;
        }

        if let Some(message) = rejected.into_inner() {
            return Err(SweepError::PushError { message });
        }

        Ok(())
    }

    fn push_with_upstream(&self, remote_name: &str, branch: &str) -> Result<()> {
        self.push(remote_name, branch)?;

        // Not every transport updates the tracking ref after a push.
        let tracking = format!("refs/remotes/{}/{}", remote_name, branch);
        if self.repo.find_reference(&tracking).is_err() {
            let head = self.repo.head()?.peel_to_commit()?;
            self.repo
                .reference(&tracking, head.id(), true, "push: create tracking ref")?;
        }

        let mut local_branch = self.repo.find_branch(branch, git2::BranchType::Local)?;
        let upstream_name = format!("{}/{}", remote_name, branch);
        local_branch.set_upstream(Some(&upstream_name))?;

        Ok(())
    }

    fn fetch_branch(&self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            SweepError::PushError {
                message: format!("Remote '{}' not found", remote_name),
            }
        })?;

        let refspec = format!(
            "+refs/heads/{}:refs/remotes/{}/{}",
            branch, remote_name, branch
        );

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.auth.callbacks());
        // The local transport cannot fetch shallowly.
        if !remote.url().is_some_and(is_local_url) {
            fetch_options.depth(1);
        }

        remote.fetch(&[&refspec], Some(&mut fetch_options), None)?;

        Ok(())
    }
}

/// Returns true for remotes reached through the filesystem.
fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || !url.contains("://") && !url.contains('@')
}

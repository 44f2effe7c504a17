//! Git branch operations.

use crate::error::{Result, SweepError};
use crate::git::{GitOps, PushOps};
use git2::BranchType;
use tracing::debug;

/// Where the patch branch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOrigin {
    /// A local branch with that name already existed.
    Local,
    /// The branch existed on the remote and was checked out from there.
    Remote,
    /// A new branch was created from the remote default branch tip.
    Created,
}

/// Branch operations for GitOps.
pub trait BranchOps {
    /// Checkout an existing local branch.
    fn checkout_branch(&self, name: &str) -> Result<()>;

    /// Check if a branch exists locally.
    fn branch_exists(&self, name: &str) -> bool;

    /// Check if a remote-tracking branch exists.
    fn remote_branch_exists(&self, remote: &str, name: &str) -> bool;

    /// Makes `name` the checked-out branch without ever creating a second one.
    ///
    /// Checks out `default_branch` first, then switches to an existing local
    /// or remote `name`, or creates it from `origin/<default_branch>`.
    fn ensure_patch_branch(&self, default_branch: &str, name: &str) -> Result<BranchOrigin>;
}

impl BranchOps for GitOps {
    fn checkout_branch(&self, name: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", name);

        let reference =
            self.repo
                .find_reference(&refname)
                .map_err(|_| SweepError::BranchError {
                    message: format!("Branch '{}' not found", name),
                })?;

        let obj = reference.peel(git2::ObjectType::Commit)?;
        self.repo.checkout_tree(&obj, None)?;
        self.repo.set_head(&refname)?;

        Ok(())
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    fn remote_branch_exists(&self, remote: &str, name: &str) -> bool {
        self.repo
            .find_reference(&format!("refs/remotes/{}/{}", remote, name))
            .is_ok()
    }

    fn ensure_patch_branch(&self, default_branch: &str, name: &str) -> Result<BranchOrigin> {
        if !self.branch_exists(default_branch) {
            let tip = self
                .repo
                .find_reference(&format!("refs/remotes/origin/{}", default_branch))
                .and_then(|r| r.peel_to_commit())
                .map_err(|_| SweepError::BranchError {
                    message: format!("Default branch '{}' not found", default_branch),
                })?;
            self.repo.branch(default_branch, &tip, false)?;
        }
        self.checkout_branch(default_branch)?;

        if let Err(e) = self.fetch_branch("origin", default_branch) {
            debug!(branch = default_branch, error = %e, "could not refresh default branch");
        }
        if let Err(e) = self.fetch_branch("origin", name) {
            debug!(branch = name, error = %e, "patch branch not on remote");
        }

        if self.branch_exists(name) {
            self.checkout_branch(name)?;
            return Ok(BranchOrigin::Local);
        }

        if self.remote_branch_exists("origin", name) {
            let commit = self
                .repo
                .find_reference(&format!("refs/remotes/origin/{}", name))?
                .peel_to_commit()?;
            let mut branch = self.repo.branch(name, &commit, false)?;
            branch.set_upstream(Some(&format!("origin/{}", name)))?;
            self.checkout_branch(name)?;
            return Ok(BranchOrigin::Remote);
        }

        let base = match self
            .repo
            .find_reference(&format!("refs/remotes/origin/{}", default_branch))
        {
            Ok(reference) => reference.peel_to_commit()?,
            Err(_) => self.repo.head()?.peel_to_commit()?,
        };
        self.repo.branch(name, &base, false)?;
        self.checkout_branch(name)?;

        Ok(BranchOrigin::Created)
    }
}

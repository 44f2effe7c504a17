//! Git write operations for the patch branch, commits, and pushing.
//!
//! ```rust,no_run
//! use org_url_sweep::git::{GitOps, GitAuth, BranchOps, CommitOps, PushOps};
//!
//! let git = GitOps::open("./checkout")?.with_auth(GitAuth::token("ghp_..."));
//!
//! git.ensure_patch_branch("main", "chore/update-org-urls/from-a-to-b")?;
//! // ... patch files ...
//! if git.stage_all_and_check()? {
//!     git.commit("chore: update organization URLs")?;
//!     git.push_with_upstream("origin", "chore/update-org-urls/from-a-to-b")?;
//! }
//! # Ok::<(), org_url_sweep::error::SweepError>(())
//! ```

mod auth;
mod branch;
mod commit;
mod push;

pub use auth::GitAuth;
pub use branch::{BranchOps, BranchOrigin};
pub use commit::CommitOps;
pub use push::PushOps;

use crate::error::Result;
use git2::Repository;
use std::path::Path;

/// Git operations wrapper with write capabilities.
pub struct GitOps {
    repo: Repository,
    auth: GitAuth,
}

impl GitOps {
    /// Open an existing repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        Ok(Self {
            repo,
            auth: GitAuth::None,
        })
    }

    /// Set authentication method for remote operations.
    pub fn with_auth(mut self, auth: GitAuth) -> Self {
        self.auth = auth;
        self
    }
}

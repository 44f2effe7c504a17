//! Git commit operations.

use crate::error::Result;
use crate::git::GitOps;
use git2::{IndexAddOption, Signature};

/// Name used when git config has no identity.
pub const FALLBACK_AUTHOR_NAME: &str = "org-url-sweep";
pub const FALLBACK_AUTHOR_EMAIL: &str = "org-url-sweep@users.noreply.github.com";

/// Commit operations for GitOps.
pub trait CommitOps {
    /// Stage all changes (new, modified, deleted files).
    fn stage_all(&self) -> Result<()>;

    /// Stages everything and reports whether the index differs from HEAD.
    fn stage_all_and_check(&self) -> Result<bool>;

    /// Create a commit with the staged changes.
    fn commit(&self, message: &str) -> Result<git2::Oid>;

    /// Check if there are staged changes.
    fn has_staged_changes(&self) -> Result<bool>;
}

impl CommitOps for GitOps {
    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;

        index.write()?;
        Ok(())
    }

    fn stage_all_and_check(&self) -> Result<bool> {
        self.stage_all()?;
        self.has_staged_changes()
    }

    fn commit(&self, message: &str) -> Result<git2::Oid> {
        let signature = self.signature()?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(oid)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let head = self.repo.head()?.peel_to_tree()?;
        let diff = self.repo.diff_tree_to_index(Some(&head), None, None)?;
        Ok(diff.deltas().count() > 0)
    }
}

impl GitOps {
    fn signature(&self) -> Result<Signature<'static>> {
        self.repo
            .signature()
            .or_else(|_| Signature::now(FALLBACK_AUTHOR_NAME, FALLBACK_AUTHOR_EMAIL))
            .map_err(Into::into)
    }
}

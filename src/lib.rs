//! # org-url-sweep
//!
//! Replaces a renamed organization's old URL with its new one across every
//! repository of an organization, and lands the change through a branch, a
//! commit and a pull request per repository.
//!
//! This crate provides:
//! - Discovering candidate repositories (write access, no forks, optional
//!   archive and visibility filters)
//! - Scanning working trees for the old URL with `rg`, `git grep` or an
//!   in-process walk, skipping vendored directories and binary files
//! - Literal, byte-preserving replacement in UTF-8 and Latin-1 files
//! - Idempotent branch naming and pull request reuse
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use org_url_sweep::prelude::*;
//!
//! let config = SweepConfig::new(
//!     "EutropicAI",
//!     "https://github.com/TensoRaws",
//!     "https://github.com/EutropicAI",
//! )
//! .dry_run(true)
//! .validate()?;
//!
//! let client = GitHubClient::new(config.token.clone())?;
//! let scanner = Scanner::detect(config.search)?;
//! let summary = Pipeline::new(&config, &client, &scanner)?.run()?;
//!
//! println!("{}", summary);
//! # Ok::<(), org_url_sweep::error::SweepError>(())
//! ```
//!
//! ## Patching a single checkout
//!
//! ```rust,no_run
//! use org_url_sweep::prelude::*;
//! use std::path::Path;
//!
//! let config = SweepConfig::new(
//!     "EutropicAI",
//!     "https://github.com/TensoRaws",
//!     "https://github.com/EutropicAI",
//! );
//! let scanner = Scanner::detect(SearchStrategy::Walk)?;
//! let report = scanner.scan(Path::new("./AnimeSR"), &config.old_url)?;
//!
//! let result = Patcher::for_repo("./AnimeSR", &config, "AnimeSR")?
//!     .dry_run()
//!     .apply(&report.paths())?;
//! println!("{}", result.diff(Path::new("./AnimeSR")));
//! # Ok::<(), org_url_sweep::error::SweepError>(())
//! ```

pub mod config;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod git;
pub mod github;
pub mod host;
pub mod patch;
pub mod pipeline;
pub mod scan;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::SweepConfig;
    pub use crate::discovery::{Permission, RepoDescriptor, Visibility};
    pub use crate::error::{Result, SweepError};
    pub use crate::git::{BranchOps, CommitOps, GitAuth, GitOps, PushOps};
    pub use crate::github::{CreatePullRequest, GitHubClient, PullRequest};
    pub use crate::host::RepoHost;
    pub use crate::patch::{PatchResult, Patcher};
    pub use crate::pipeline::{Confirm, Pipeline, RepoOutcome, RunSummary, Stage};
    pub use crate::scan::{OccurrenceSearch, ScanReport, Scanner, SearchStrategy};
    pub use crate::transform::{TextEncoding, TextTransform, Transform, TransformBuilder};
}

pub use prelude::*;

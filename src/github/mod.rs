//! GitHub API integration.
//!
//! This module provides a client for interacting with the GitHub API to:
//! - List repositories of an organization
//! - Clone repositories shallowly
//! - Find and create pull requests
//!
//! # Example
//!
//! ```rust,no_run
//! use org_url_sweep::github::{GitHubClient, RepoOps};
//!
//! let client = GitHubClient::new(Some("ghp_your_token_here".into()))?;
//!
//! for repo in client.list_org_repos("EutropicAI")? {
//!     println!("{}: {}", repo.name, repo.clone_url);
//! }
//! # Ok::<(), org_url_sweep::error::SweepError>(())
//! ```

mod client;
mod clone;
mod pr;
mod repos;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use clone::{clone_full, clone_shallow};
pub use pr::{CreatePullRequest, PullRequest, PullRequestOps};
pub use repos::{GitHubRepo, PAGE_SIZE, RepoOps, RepoPermissions};

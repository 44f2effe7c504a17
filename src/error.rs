//! Error types for the URL sweep.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sweep operations.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Required tool not available: {tool}")]
    MissingDependency { tool: String },

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GitHub API error: {message}")]
    GitHub { message: String },

    #[error("Clone failed for {repo}: {message}")]
    CloneError { repo: String, message: String },

    #[error("Branch operation failed: {message}")]
    BranchError { message: String },

    #[error("Push failed: {message}")]
    PushError { message: String },

    #[error("Pull request operation failed: {message}")]
    PullRequestError { message: String },

    #[error("Search with {tool} failed: {message}")]
    SearchFailed { tool: String, message: String },

    #[error("Cannot re-encode {path}: {message}")]
    Encoding { path: PathBuf, message: String },
}

/// A specialized Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;

//! Pull request operations using octocrab.

use crate::error::{Result, SweepError};
use crate::github::GitHubClient;
use octocrab::models::pulls::PullRequest as OctocrabPR;

/// A pull request on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    pub title: String,
    pub head: String,
    pub base: String,
}

impl From<OctocrabPR> for PullRequest {
    fn from(pr: OctocrabPR) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
            title: pr.title.unwrap_or_default(),
            head: pr.head.ref_field,
            base: pr.base.ref_field,
        }
    }
}

/// Request body for creating a pull request.
#[derive(Debug, Clone)]
pub struct CreatePullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

impl CreatePullRequest {
    /// Create a new pull request.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        head: impl Into<String>,
        base: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            head: head.into(),
            base: base.into(),
        }
    }
}

/// Pull request operations.
pub trait PullRequestOps {
    /// Finds an open pull request from `head` into `base`.
    ///
    /// `head` is a bare branch name; it is qualified with `owner`.
    fn find_open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>>;

    /// Create a new pull request.
    fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: CreatePullRequest,
    ) -> Result<PullRequest>;
}

impl PullRequestOps for GitHubClient {
    fn find_open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>> {
        let qualified_head = format!("{}:{}", owner, head);

        self.block_on(async {
            let page = self
                .octocrab
                .pulls(owner, repo)
                .list()
                .state(octocrab::params::State::Open)
                .head(qualified_head)
                .base(base)
                .per_page(10)
                .send()
                .await
                .map_err(|e| SweepError::GitHub {
                    message: format!("Failed to list pull requests: {}", e),
                })?;

            Ok(page.items.into_iter().next().map(PullRequest::from))
        })
    }

    fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: CreatePullRequest,
    ) -> Result<PullRequest> {
        self.block_on(async {
            let pulls = self.octocrab.pulls(owner, repo);
            let result = pulls
                .create(&pr.title, &pr.head, &pr.base)
                .body(&pr.body)
                .send()
                .await
                .map_err(|e| {
                    let msg = e.to_string();
                    if msg.contains("422") || msg.contains("Validation Failed") {
                        SweepError::PullRequestError {
                            message: format!(
                                "Failed to create PR (branch may not exist or PR already exists): {}",
                                msg
                            ),
                        }
                    } else {
                        SweepError::PullRequestError {
                            message: format!("Failed to create PR: {}", msg),
                        }
                    }
                })?;

            Ok(PullRequest::from(result))
        })
    }
}

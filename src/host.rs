//! The hosting platform as seen by the pipeline.

use crate::discovery::RepoDescriptor;
use crate::error::{Result, SweepError};
use crate::git::GitAuth;
use crate::github::{self, CreatePullRequest, GitHubClient, PullRequest, PullRequestOps, RepoOps};
use std::path::Path;

/// Everything the pipeline asks of a repository host.
pub trait RepoHost {
    /// Lists every repository of `org`, unfiltered.
    fn list_org_repos(&self, org: &str) -> Result<Vec<RepoDescriptor>>;

    /// Resolves a single repository by name.
    fn get_repo(&self, owner: &str, name: &str) -> Result<RepoDescriptor>;

    /// Clones the default branch of `repo` into the empty directory `target`.
    fn clone_repo(&self, repo: &RepoDescriptor, branch: &str, target: &Path) -> Result<()>;

    /// Credentials for fetch and push on a clone made by [`RepoHost::clone_repo`].
    fn git_auth(&self) -> GitAuth;

    /// Finds an open pull request from `head` into `base`.
    fn find_pull_request(
        &self,
        repo: &RepoDescriptor,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>>;

    /// Opens a pull request.
    fn create_pull_request(&self, repo: &RepoDescriptor, pr: CreatePullRequest) -> Result<PullRequest>;
}

impl RepoHost for GitHubClient {
    fn list_org_repos(&self, org: &str) -> Result<Vec<RepoDescriptor>> {
        let repos = RepoOps::list_org_repos(self, org)?;
        Ok(repos.into_iter().map(RepoDescriptor::from).collect())
    }

    fn get_repo(&self, owner: &str, name: &str) -> Result<RepoDescriptor> {
        RepoOps::get_repo(self, owner, name).map(RepoDescriptor::from)
    }

    fn clone_repo(&self, repo: &RepoDescriptor, branch: &str, target: &Path) -> Result<()> {
        if !repo.clone_url.starts_with("https://") {
            return Err(SweepError::CloneError {
                repo: repo.full_name.clone(),
                message: format!("refusing non-HTTPS clone URL {}", repo.clone_url),
            });
        }
        github::clone_shallow(&repo.full_name, &repo.clone_url, branch, target, &self.git_auth())?;
        Ok(())
    }

    fn git_auth(&self) -> GitAuth {
        match self.token() {
            Some(token) => GitAuth::token(token),
            None => GitAuth::None,
        }
    }

    fn find_pull_request(
        &self,
        repo: &RepoDescriptor,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>> {
        self.find_open_pull_request(repo.owner(), &repo.name, head, base)
    }

    fn create_pull_request(&self, repo: &RepoDescriptor, pr: CreatePullRequest) -> Result<PullRequest> {
        PullRequestOps::create_pull_request(self, repo.owner(), &repo.name, pr)
    }
}

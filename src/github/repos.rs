//! GitHub repository operations.

use crate::error::Result;
use crate::github::GitHubClient;
use serde::Deserialize;

/// Page size used when listing an organization.
pub const PAGE_SIZE: usize = 100;

/// Repository information from GitHub API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    /// Empty repositories have no default branch.
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(rename = "private", default)]
    pub is_private: bool,
    /// `public`, `private` or `internal`; older API versions omit it.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Only present when the request was authenticated.
    #[serde(default)]
    pub permissions: Option<RepoPermissions>,
}

/// The caller's permissions on a repository.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RepoPermissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub maintain: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub triage: bool,
    #[serde(default)]
    pub pull: bool,
}

/// Repository listing operations.
pub trait RepoOps {
    /// List all repositories in an organization, following pagination.
    fn list_org_repos(&self, org: &str) -> Result<Vec<GitHubRepo>>;

    /// Get a specific repository.
    fn get_repo(&self, owner: &str, name: &str) -> Result<GitHubRepo>;
}

impl RepoOps for GitHubClient {
    fn list_org_repos(&self, org: &str) -> Result<Vec<GitHubRepo>> {
        let mut all_repos = Vec::new();
        let mut page = 1;

        loop {
            let mut url = self.endpoint(&["orgs", org, "repos"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string())
                .append_pair("type", "all");
            let repos: Vec<GitHubRepo> = self.get(url)?;
            let fetched = repos.len();

            all_repos.extend(repos);

            if fetched < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all_repos)
    }

    fn get_repo(&self, owner: &str, name: &str) -> Result<GitHubRepo> {
        self.get(self.endpoint(&["repos", owner, name])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_repo_payload() {
        let json = r#"{
            "id": 7,
            "name": "AnimeSR",
            "full_name": "EutropicAI/AnimeSR",
            "clone_url": "https://github.com/EutropicAI/AnimeSR.git",
            "default_branch": "main",
            "archived": false,
            "fork": false,
            "private": false,
            "visibility": "public",
            "permissions": {"admin": false, "maintain": false, "push": true, "triage": true, "pull": true},
            "stargazers_count": 12
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "EutropicAI/AnimeSR");
        assert_eq!(repo.default_branch.as_deref(), Some("main"));
        assert!(repo.permissions.unwrap().push);
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let json = r#"{
            "id": 8,
            "name": "empty",
            "full_name": "EutropicAI/empty",
            "clone_url": "https://github.com/EutropicAI/empty.git",
            "default_branch": null
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert!(repo.default_branch.is_none());
        assert!(repo.permissions.is_none());
        assert!(repo.visibility.is_none());
    }
}

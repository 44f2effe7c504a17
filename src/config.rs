//! Run configuration.
//!
//! A [`SweepConfig`] is built once from the command line and environment,
//! validated, and then only ever borrowed. Every repository in a run is
//! evaluated against the same old/new URL pair.

use crate::error::{Result, SweepError};
use crate::scan::SearchStrategy;
use std::time::Duration;

/// Default branch-name prefix for patch branches.
pub const DEFAULT_BRANCH_PREFIX: &str = "chore/update-org-urls";

/// Default cap on the number of listed repositories.
pub const DEFAULT_LIMIT: usize = 1000;

/// Default pause between repositories.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Immutable settings for one sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub org: String,
    pub old_url: String,
    pub new_url: String,
    pub branch_prefix: String,
    pub limit: usize,
    pub only_public: bool,
    pub include_archived: bool,
    pub repos: Vec<String>,
    pub dry_run: bool,
    pub delay: Duration,
    pub confirm: bool,
    pub search: SearchStrategy,
    pub convert_license_links: bool,
    pub show_diff: bool,
    pub token: Option<String>,
}

impl SweepConfig {
    /// Creates a configuration with defaults for everything but the
    /// organization and the URL pair.
    pub fn new(
        org: impl Into<String>,
        old_url: impl Into<String>,
        new_url: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            old_url: old_url.into(),
            new_url: new_url.into(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.into(),
            limit: DEFAULT_LIMIT,
            only_public: false,
            include_archived: false,
            repos: Vec::new(),
            dry_run: false,
            delay: DEFAULT_DELAY,
            confirm: false,
            search: SearchStrategy::Auto,
            convert_license_links: false,
            show_diff: false,
            token: None,
        }
    }

    /// Sets the prefix used for the patch branch.
    pub fn branch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.branch_prefix = prefix.into();
        self
    }

    /// Caps the number of listed repositories.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Only consider public repositories.
    pub fn only_public(mut self, yes: bool) -> Self {
        self.only_public = yes;
        self
    }

    /// Also consider archived repositories.
    pub fn include_archived(mut self, yes: bool) -> Self {
        self.include_archived = yes;
        self
    }

    /// Restricts the run to these repository names, bypassing listing filters.
    pub fn repos(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.repos = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enables dry-run mode (scan and report only).
    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    /// Sets the pause between repositories.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Asks the operator before committing in each repository.
    pub fn confirm(mut self, yes: bool) -> Self {
        self.confirm = yes;
        self
    }

    /// Chooses the occurrence search strategy.
    pub fn search(mut self, strategy: SearchStrategy) -> Self {
        self.search = strategy;
        self
    }

    /// Also rewrites absolute LICENSE links to `./LICENSE`.
    pub fn convert_license_links(mut self, yes: bool) -> Self {
        self.convert_license_links = yes;
        self
    }

    /// Logs a unified diff of every patched file.
    pub fn show_diff(mut self, yes: bool) -> Self {
        self.show_diff = yes;
        self
    }

    /// Sets the GitHub token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token.trim().to_string())
        };
        self
    }

    /// Checks the configuration before any repository is touched.
    pub fn validate(self) -> Result<Self> {
        if self.org.trim().is_empty() {
            return Err(SweepError::InvalidConfig("organization must not be empty".into()));
        }
        if self.old_url.is_empty() || self.new_url.is_empty() {
            return Err(SweepError::InvalidConfig(
                "old and new URLs must not be empty".into(),
            ));
        }
        if self.limit == 0 {
            return Err(SweepError::InvalidConfig("limit must be at least 1".into()));
        }

        let branch = self.patch_branch();
        if !git2::Reference::is_valid_name(&format!("refs/heads/{}", branch)) {
            return Err(SweepError::InvalidConfig(format!(
                "'{}' is not a valid branch name",
                branch
            )));
        }

        if !self.dry_run && self.token.is_none() {
            return Err(SweepError::MissingCredential(
                "GITHUB_TOKEN is required to push branches and open pull requests".into(),
            ));
        }

        Ok(self)
    }

    /// The deterministic patch branch for this URL pair.
    pub fn patch_branch(&self) -> String {
        let tail = format!(
            "from-{}-to-{}",
            branch_segment(&self.old_url),
            branch_segment(&self.new_url)
        );
        sanitize_branch_name(&format!("{}/{}", self.branch_prefix, tail))
    }

    /// Commit message for a repository with `replacements` URL rewrites.
    pub fn commit_message(&self, replacements: usize, license_links: usize) -> String {
        let mut lines = vec![
            "chore: update organization URLs".to_string(),
            String::new(),
            "Changes:".to_string(),
            format!(
                "- Replaced {} occurrence(s) of\n  {}\n  with\n  {}",
                replacements, self.old_url, self.new_url
            ),
        ];
        if self.convert_license_links {
            lines.push(format!("- Converted {} LICENSE link(s) to ./LICENSE", license_links));
        }
        lines.push(String::new());
        lines.push("Reason: the organization was renamed; links should point at its new home.".into());
        lines.join("\n")
    }

    /// Pull request title.
    pub fn pr_title(&self) -> String {
        "chore: update organization URLs".to_string()
    }

    /// Pull request body.
    pub fn pr_body(&self, replacements: usize, files: usize) -> String {
        [
            "This PR replaces links to the old organization with links to its renamed successor.".to_string(),
            String::new(),
            format!("Old base: {}", self.old_url),
            format!("New base: {}", self.new_url),
            String::new(),
            format!("Replacements: {} in {} file(s)", replacements, files),
        ]
        .join("\n")
    }
}

/// Strips the scheme and flattens slashes so a URL can sit in a branch name.
fn branch_segment(url: &str) -> String {
    let without_scheme = url.rsplit("://").next().unwrap_or(url);
    without_scheme.replace('/', "-")
}

/// Maps arbitrary text onto a conservative git branch name.
pub fn sanitize_branch_name(raw: &str) -> String {
    let mut safe: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '/' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    while safe.contains("--") {
        safe = safe.replace("--", "-");
    }

    let trimmed = safe.trim_matches(|c| c == '-' || c == '/');
    if trimmed.is_empty() {
        "update-urls".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SweepConfig {
        SweepConfig::new(
            "EutropicAI",
            "https://github.com/TensoRaws",
            "https://github.com/EutropicAI",
        )
    }

    #[test]
    fn test_patch_branch_is_deterministic() {
        let branch = config().patch_branch();
        assert_eq!(
            branch,
            "chore/update-org-urls/from-github.com-TensoRaws-to-github.com-EutropicAI"
        );
        assert_eq!(branch, config().patch_branch());
    }

    #[test]
    fn test_sanitize_replaces_and_collapses() {
        assert_eq!(sanitize_branch_name("a b::c"), "a-b-c");
        assert_eq!(sanitize_branch_name("--/x/--"), "x");
        assert_eq!(sanitize_branch_name("???"), "update-urls");
    }

    #[test]
    fn test_validate_requires_token_outside_dry_run() {
        let err = config().validate().unwrap_err();
        assert!(matches!(err, SweepError::MissingCredential(_)));

        assert!(config().dry_run(true).validate().is_ok());
        assert!(config().token("ghp_x").validate().is_ok());
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let cfg = config().token("   ");
        assert!(cfg.token.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_urls() {
        let err = SweepConfig::new("org", "", "x").dry_run(true).validate().unwrap_err();
        assert!(matches!(err, SweepError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_bad_branch_prefix() {
        let err = config()
            .dry_run(true)
            .branch_prefix("bad..prefix")
            .validate()
            .unwrap_err();
        assert!(matches!(err, SweepError::InvalidConfig(_)));
    }

    #[test]
    fn test_commit_message_names_both_urls() {
        let msg = config().commit_message(3, 0);
        assert!(msg.starts_with("chore: update organization URLs"));
        assert!(msg.contains("Replaced 3 occurrence(s)"));
        assert!(msg.contains("https://github.com/TensoRaws"));
        assert!(msg.contains("https://github.com/EutropicAI"));
        assert!(!msg.contains("LICENSE"));
    }
}

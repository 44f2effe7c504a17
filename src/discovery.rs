//! Repository discovery: listing an organization and choosing candidates.

use crate::config::SweepConfig;
use crate::error::Result;
use crate::github::{GitHubRepo, RepoPermissions};
use crate::host::RepoHost;
use std::fmt;
use tracing::{info, warn};

/// Repository visibility on the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

impl Visibility {
    fn parse(visibility: Option<&str>, is_private: bool) -> Self {
        match visibility.map(str::to_ascii_lowercase).as_deref() {
            Some("public") => Self::Public,
            Some("internal") => Self::Internal,
            Some("private") => Self::Private,
            _ if is_private => Self::Private,
            _ => Self::Public,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// The caller's highest permission on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Permission {
    None,
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl Permission {
    /// Whether the permission allows pushing a branch.
    pub fn has_write(self) -> bool {
        self >= Permission::Push
    }
}

impl From<RepoPermissions> for Permission {
    fn from(p: RepoPermissions) -> Self {
        if p.admin {
            Self::Admin
        } else if p.maintain {
            Self::Maintain
        } else if p.push {
            Self::Push
        } else if p.triage {
            Self::Triage
        } else if p.pull {
            Self::Pull
        } else {
            Self::None
        }
    }
}

/// What the pipeline needs to know about one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    /// `None` for empty repositories.
    pub default_branch: Option<String>,
    pub visibility: Visibility,
    pub archived: bool,
    pub fork: bool,
    /// `None` when the platform did not report permissions (anonymous listing).
    pub permission: Option<Permission>,
}

impl RepoDescriptor {
    /// Owner segment of the full name.
    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(&self.full_name)
    }

    /// Default branch, treating an empty string as absent.
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref().filter(|b| !b.trim().is_empty())
    }
}

impl From<GitHubRepo> for RepoDescriptor {
    fn from(repo: GitHubRepo) -> Self {
        Self {
            visibility: Visibility::parse(repo.visibility.as_deref(), repo.is_private),
            permission: repo.permissions.map(Permission::from),
            name: repo.name,
            full_name: repo.full_name,
            clone_url: repo.clone_url,
            default_branch: repo.default_branch,
            archived: repo.archived,
            fork: repo.fork,
        }
    }
}

/// Why a listed repository was not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Fork,
    Archived,
    NotPublic,
    NoWriteAccess,
}

/// Applies the listing filters to one repository.
pub fn rejection(repo: &RepoDescriptor, config: &SweepConfig) -> Option<Rejection> {
    if repo.fork {
        return Some(Rejection::Fork);
    }
    if repo.archived && !config.include_archived {
        return Some(Rejection::Archived);
    }
    if config.only_public && repo.visibility != Visibility::Public {
        return Some(Rejection::NotPublic);
    }
    if repo.permission.is_some_and(|p| !p.has_write()) {
        return Some(Rejection::NoWriteAccess);
    }
    None
}

/// Filters a listing in order, then applies the limit.
pub fn select_candidates(repos: Vec<RepoDescriptor>, config: &SweepConfig) -> Vec<RepoDescriptor> {
    repos
        .into_iter()
        .filter(|repo| rejection(repo, config).is_none())
        .take(config.limit)
        .collect()
}

/// Produces the ordered list of repositories to process.
///
/// An explicit name list bypasses filtering; names that cannot be resolved are
/// logged and skipped. A failing organization listing is returned as an error.
pub fn discover<H: RepoHost + ?Sized>(host: &H, config: &SweepConfig) -> Result<Vec<RepoDescriptor>> {
    if !config.repos.is_empty() {
        let mut resolved = Vec::with_capacity(config.repos.len());
        for name in &config.repos {
            match host.get_repo(&config.org, name) {
                Ok(repo) => resolved.push(repo),
                Err(e) => warn!(repo = %name, error = %e, "could not resolve repository, skipping"),
            }
        }
        info!(count = resolved.len(), "resolved explicit repositories");
        return Ok(resolved);
    }

    let listed = host.list_org_repos(&config.org)?;
    let total = listed.len();
    let selected = select_candidates(listed, config);
    info!(listed = total, selected = selected.len(), org = %config.org, "listed repositories");

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str) -> RepoDescriptor {
        RepoDescriptor {
            name: name.into(),
            full_name: format!("EutropicAI/{}", name),
            clone_url: format!("https://github.com/EutropicAI/{}.git", name),
            default_branch: Some("main".into()),
            visibility: Visibility::Public,
            archived: false,
            fork: false,
            permission: Some(Permission::Push),
        }
    }

    fn config() -> SweepConfig {
        SweepConfig::new(
            "EutropicAI",
            "https://github.com/TensoRaws",
            "https://github.com/EutropicAI",
        )
    }

    #[test]
    fn test_forks_always_excluded() {
        let mut fork = repo("fork");
        fork.fork = true;
        let cfg = config().include_archived(true);
        assert_eq!(rejection(&fork, &cfg), Some(Rejection::Fork));
    }

    #[test]
    fn test_archived_needs_opt_in() {
        let mut archived = repo("old");
        archived.archived = true;
        assert_eq!(rejection(&archived, &config()), Some(Rejection::Archived));
        assert_eq!(rejection(&archived, &config().include_archived(true)), None);
    }

    #[test]
    fn test_only_public_drops_private_and_internal() {
        let mut private = repo("secret");
        private.visibility = Visibility::Private;
        let mut internal = repo("inner");
        internal.visibility = Visibility::Internal;
        let cfg = config().only_public(true);

        let selected = select_candidates(vec![private, internal, repo("open")], &cfg);
        let names: Vec<_> = selected.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["open"]);
    }

    #[test]
    fn test_write_access_required() {
        let mut read_only = repo("ro");
        read_only.permission = Some(Permission::Triage);
        let mut maintainer = repo("mt");
        maintainer.permission = Some(Permission::Maintain);

        assert_eq!(rejection(&read_only, &config()), Some(Rejection::NoWriteAccess));
        assert_eq!(rejection(&maintainer, &config()), None);
    }

    #[test]
    fn test_limit_applies_after_filtering() {
        let mut fork = repo("a");
        fork.fork = true;
        let repos = vec![fork, repo("b"), repo("c"), repo("d")];

        let selected = select_candidates(repos, &config().limit(2));
        let names: Vec<_> = selected.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_permission_from_flags() {
        let perms = RepoPermissions {
            push: true,
            pull: true,
            ..Default::default()
        };
        assert_eq!(Permission::from(perms), Permission::Push);
        assert!(Permission::Admin.has_write());
        assert!(!Permission::Pull.has_write());
    }

    #[test]
    fn test_visibility_falls_back_to_private_flag() {
        assert_eq!(Visibility::parse(None, true), Visibility::Private);
        assert_eq!(Visibility::parse(None, false), Visibility::Public);
        assert_eq!(Visibility::parse(Some("internal"), true), Visibility::Internal);
    }

    #[test]
    fn test_blank_default_branch_is_absent() {
        let mut empty = repo("empty");
        empty.default_branch = Some(String::new());
        assert_eq!(empty.default_branch(), None);
        assert_eq!(repo("x").default_branch(), Some("main"));
        assert_eq!(repo("x").owner(), "EutropicAI");
    }
}

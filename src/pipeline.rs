//! Per-repository orchestration: clone, scan, patch, commit, push, pull request.

use crate::config::SweepConfig;
use crate::discovery::{self, RepoDescriptor};
use crate::error::Result;
use crate::git::{BranchOps, BranchOrigin, CommitOps, GitOps, PushOps};
use crate::github::CreatePullRequest;
use crate::host::RepoHost;
use crate::patch::Patcher;
use crate::scan::{ScanReport, Scanner};
use crate::transform::license_link_pattern;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, error, info, info_span, warn};

/// The step at which a repository's run stopped with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Clone,
    Scan,
    Branch,
    Patch,
    Commit,
    Push,
    PullRequest,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::Clone => "clone",
            Stage::Scan => "scan",
            Stage::Branch => "branch",
            Stage::Patch => "patch",
            Stage::Commit => "commit",
            Stage::Push => "push",
            Stage::PullRequest => "pull-request",
        };
        f.write_str(name)
    }
}

/// Terminal state of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// The old URL does not appear anywhere.
    NoMatches,
    /// Dry-run: these files would be patched.
    DryRun { files: Vec<PathBuf> },
    /// The operator answered no.
    Declined,
    /// Patching left the tree identical to the branch tip.
    NoDiff,
    /// Pushed; an open pull request already covered the branch.
    PullRequestReused { url: String },
    /// Pushed and opened a new pull request.
    PullRequestCreated { url: String },
    Failed { stage: Stage, message: String },
}

impl RepoOutcome {
    fn failed(stage: Stage, err: impl fmt::Display) -> Self {
        Self::Failed {
            stage,
            message: err.to_string(),
        }
    }

    /// Whether the working tree got as far as being scanned.
    pub fn was_scanned(&self) -> bool {
        !matches!(
            self,
            Self::Failed {
                stage: Stage::Resolve | Stage::Clone | Stage::Scan,
                ..
            }
        )
    }
}

impl fmt::Display for RepoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatches => write!(f, "no matches"),
            Self::DryRun { files } => write!(f, "dry-run, {} file(s) would change", files.len()),
            Self::Declined => write!(f, "declined"),
            Self::NoDiff => write!(f, "no diff after patching"),
            Self::PullRequestReused { url } => write!(f, "pull request exists: {}", url),
            Self::PullRequestCreated { url } => write!(f, "pull request created: {}", url),
            Self::Failed { stage, message } => write!(f, "failed at {}: {}", stage, message),
        }
    }
}

/// Counters folded from every repository outcome.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub repositories: usize,
    pub scanned: usize,
    pub prs_created: usize,
    pub prs_reused: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<(String, RepoOutcome)>,
}

impl RunSummary {
    pub fn record(&mut self, repo: &str, outcome: RepoOutcome) {
        self.repositories += 1;
        if outcome.was_scanned() {
            self.scanned += 1;
        }
        match &outcome {
            RepoOutcome::PullRequestCreated { .. } => self.prs_created += 1,
            RepoOutcome::PullRequestReused { .. } => self.prs_reused += 1,
            RepoOutcome::Failed { .. } => self.failed += 1,
            RepoOutcome::NoMatches
            | RepoOutcome::DryRun { .. }
            | RepoOutcome::Declined
            | RepoOutcome::NoDiff => self.skipped += 1,
        }
        self.outcomes.push((repo.to_string(), outcome));
    }

    /// Outcome recorded for `repo`, if any.
    pub fn outcome(&self, repo: &str) -> Option<&RepoOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == repo)
            .map(|(_, outcome)| outcome)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, outcome) in &self.outcomes {
            writeln!(f, "  {}: {}", name, outcome)?;
        }
        write!(
            f,
            "{} repositories, {} scanned, {} PR(s) created, {} PR(s) updated, {} skipped, {} failed",
            self.repositories,
            self.scanned,
            self.prs_created,
            self.prs_reused,
            self.skipped,
            self.failed
        )
    }
}

/// Asks whether to go ahead with a repository after its scan.
pub trait Confirm {
    fn confirm(&self, repo: &RepoDescriptor, report: &ScanReport) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&RepoDescriptor, &ScanReport) -> bool,
{
    fn confirm(&self, repo: &RepoDescriptor, report: &ScanReport) -> bool {
        self(repo, report)
    }
}

/// Prompts on stderr and reads the answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, repo: &RepoDescriptor, report: &ScanReport) -> bool {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}: {} file(s) to patch", repo.full_name, report.len());
        for hit in &report.hits {
            let _ = writeln!(stderr, "  {} ({})", hit.path.display(), hit.occurrences);
        }
        let _ = write!(stderr, "Proceed? [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Runs the sweep across every candidate repository, one at a time.
pub struct Pipeline<'a> {
    config: &'a SweepConfig,
    host: &'a dyn RepoHost,
    scanner: &'a Scanner,
    confirm: Box<dyn Confirm + 'a>,
    workspace: TempDir,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline with its own temporary workspace.
    pub fn new(config: &'a SweepConfig, host: &'a dyn RepoHost, scanner: &'a Scanner) -> Result<Self> {
        let workspace = tempfile::Builder::new().prefix("url-sweep-").tempdir()?;
        Ok(Self {
            config,
            host,
            scanner,
            confirm: Box::new(StdinConfirm),
            workspace,
        })
    }

    /// Replaces the interactive prompt used with `confirm`.
    pub fn with_confirm(mut self, confirm: impl Confirm + 'a) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }

    /// Discovers candidates and processes each of them.
    ///
    /// Only a failed listing is returned as an error; everything that goes
    /// wrong inside a repository ends up in that repository's outcome.
    pub fn run(&self) -> Result<RunSummary> {
        let repos = discovery::discover(self.host, self.config)?;
        let mut summary = RunSummary::default();

        info!(
            count = repos.len(),
            dry_run = self.config.dry_run,
            search = self.scanner.strategy_name(),
            "starting sweep"
        );

        for repo in &repos {
            let span = info_span!("repo", name = %repo.full_name);
            let _enter = span.enter();

            let outcome = self.process(repo);
            match &outcome {
                RepoOutcome::Failed { .. } => error!(outcome = %outcome, "repository failed"),
                _ => info!(outcome = %outcome, "repository done"),
            }
            summary.record(&repo.full_name, outcome);

            if !self.config.delay.is_zero() {
                std::thread::sleep(self.config.delay);
            }
        }

        Ok(summary)
    }

    /// Runs one repository through the whole sequence.
    pub fn process(&self, repo: &RepoDescriptor) -> RepoOutcome {
        let Some(default_branch) = repo.default_branch() else {
            return RepoOutcome::failed(Stage::Resolve, "repository has no default branch");
        };

        let checkout_dir = match tempfile::Builder::new()
            .prefix(&format!("{}-", repo.name))
            .tempdir_in(self.workspace.path())
        {
            Ok(dir) => dir,
            Err(e) => return RepoOutcome::failed(Stage::Clone, e),
        };
        let root = checkout_dir.path().join(&repo.name);

        if let Err(e) = self.host.clone_repo(repo, default_branch, &root) {
            return RepoOutcome::failed(Stage::Clone, e);
        }
        debug!(path = %root.display(), "cloned");

        let report = match self.scan(repo, &root) {
            Ok(report) => report,
            Err(e) => return RepoOutcome::failed(Stage::Scan, e),
        };
        if report.is_empty() {
            return RepoOutcome::NoMatches;
        }
        info!(
            files = report.len(),
            occurrences = report.total_occurrences(),
            license_links = report.total_license_links(),
            "found old URL"
        );

        if self.config.dry_run {
            return self.dry_run(repo, &root, report);
        }

        if self.config.confirm && !self.confirm.confirm(repo, &report) {
            return RepoOutcome::Declined;
        }

        self.publish(repo, default_branch, &root, report)
    }

    /// Files holding the old URL, plus convertible LICENSE links when enabled.
    fn scan(&self, repo: &RepoDescriptor, root: &Path) -> Result<ScanReport> {
        let mut report = self.scanner.scan(root, &self.config.old_url)?;
        if self.config.convert_license_links {
            let pattern =
                license_link_pattern(&self.config.old_url, &self.config.new_url, &repo.name)?;
            self.scanner.scan_license_links(root, &pattern, &mut report);
        }
        Ok(report)
    }

    fn dry_run(&self, repo: &RepoDescriptor, root: &Path, report: ScanReport) -> RepoOutcome {
        for hit in &report.hits {
            info!(
                file = %hit.path.display(),
                occurrences = hit.occurrences,
                license_links = hit.license_links,
                "would patch"
            );
        }

        if self.config.show_diff {
            match Patcher::for_repo(root, self.config, &repo.name)
                .and_then(|p| p.dry_run().apply(&report.paths()))
            {
                Ok(preview) => println!("{}", preview.diff(root)),
                Err(e) => warn!(error = %e, "cannot render diff preview"),
            }
        }

        RepoOutcome::DryRun {
            files: report.paths(),
        }
    }

    fn publish(
        &self,
        repo: &RepoDescriptor,
        default_branch: &str,
        root: &Path,
        report: ScanReport,
    ) -> RepoOutcome {
        let branch = self.config.patch_branch();

        let git = match GitOps::open(root) {
            Ok(git) => git.with_auth(self.host.git_auth()),
            Err(e) => return RepoOutcome::failed(Stage::Branch, e),
        };

        let origin = match git.ensure_patch_branch(default_branch, &branch) {
            Ok(origin) => origin,
            Err(e) => return RepoOutcome::failed(Stage::Branch, e),
        };
        debug!(branch = %branch, origin = ?origin, "patch branch ready");

        // A reused branch has its own content; scan it rather than the default branch.
        let report = if origin == BranchOrigin::Created {
            report
        } else {
            match self.scan(repo, root) {
                Ok(report) => report,
                Err(e) => return RepoOutcome::failed(Stage::Scan, e),
            }
        };

        let patcher = match Patcher::for_repo(root, self.config, &repo.name) {
            Ok(patcher) => patcher,
            Err(e) => return RepoOutcome::failed(Stage::Patch, e),
        };
        let patched = match patcher.apply(&report.paths()) {
            Ok(patched) => patched,
            Err(e) => return RepoOutcome::failed(Stage::Patch, e),
        };
        info!(
            files = patched.files_modified(),
            replacements = patched.replacements,
            summary = %patched.summary,
            "patched"
        );
        if self.config.show_diff && !patched.is_empty() {
            println!("{}", patched.diff(root));
        }

        match git.stage_all_and_check() {
            Ok(true) => {}
            Ok(false) => return RepoOutcome::NoDiff,
            Err(e) => return RepoOutcome::failed(Stage::Commit, e),
        }

        let message = self
            .config
            .commit_message(patched.replacements, patched.license_links);
        if let Err(e) = git.commit(&message) {
            return RepoOutcome::failed(Stage::Commit, e);
        }

        if let Err(e) = git.push_with_upstream("origin", &branch) {
            return RepoOutcome::failed(Stage::Push, e);
        }
        info!(branch = %branch, "pushed");

        match self.host.find_pull_request(repo, &branch, default_branch) {
            Ok(Some(pr)) => {
                return RepoOutcome::PullRequestReused { url: pr.html_url };
            }
            Ok(None) => {}
            Err(e) => return RepoOutcome::failed(Stage::PullRequest, e),
        }

        let request = CreatePullRequest::new(
            self.config.pr_title(),
            self.config
                .pr_body(patched.replacements, patched.files_modified()),
            branch.as_str(),
            default_branch,
        );
        match self.host.create_pull_request(repo, request) {
            Ok(pr) => RepoOutcome::PullRequestCreated { url: pr.html_url },
            Err(e) => RepoOutcome::failed(Stage::PullRequest, e),
        }
    }
}

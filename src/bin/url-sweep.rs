//! CLI for the organization URL sweep.

use anyhow::{Context, Result};
use clap::Parser;
use org_url_sweep::config::{DEFAULT_BRANCH_PREFIX, DEFAULT_LIMIT};
use org_url_sweep::github::DEFAULT_API_URL;
use org_url_sweep::prelude::*;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "url-sweep")]
#[command(author, version, about = "Replace an old organization URL across every repository of an organization", long_about = None)]
struct Cli {
    /// Organization whose repositories are swept
    #[arg(long, env = "SWEEP_ORG", default_value = "EutropicAI")]
    org: String,

    /// URL to replace
    #[arg(long, env = "SWEEP_OLD_URL", default_value = "https://github.com/TensoRaws")]
    old: String,

    /// Replacement URL
    #[arg(long, env = "SWEEP_NEW_URL", default_value = "https://github.com/EutropicAI")]
    new: String,

    /// Prefix of the patch branch
    #[arg(long, env = "SWEEP_BRANCH_PREFIX", default_value = DEFAULT_BRANCH_PREFIX)]
    branch_prefix: String,

    /// Maximum number of repositories to process
    #[arg(long, env = "SWEEP_LIMIT", default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Skip private and internal repositories
    #[arg(long, env = "SWEEP_ONLY_PUBLIC")]
    only_public: bool,

    /// Also process archived repositories
    #[arg(long, env = "SWEEP_INCLUDE_ARCHIVED")]
    include_archived: bool,

    /// Comma-separated repository names; bypasses listing filters
    #[arg(long, env = "SWEEP_REPOS", value_delimiter = ',')]
    repos: Vec<String>,

    /// Scan and report without branching, committing or pushing
    #[arg(long, env = "SWEEP_DRY_RUN")]
    dry_run: bool,

    /// Seconds to pause after each repository
    #[arg(long, env = "SWEEP_SLEEP", default_value_t = 2)]
    sleep: u64,

    /// Ask before patching each repository
    #[arg(long, env = "SWEEP_CONFIRM")]
    confirm: bool,

    /// Search backend: auto, ripgrep, git-grep or walk
    #[arg(long, env = "SWEEP_SEARCH", default_value = "auto")]
    search: SearchStrategy,

    /// Rewrite absolute LICENSE links in Markdown to ./LICENSE
    #[arg(long, env = "SWEEP_CONVERT_LICENSE_LINKS")]
    convert_license_links: bool,

    /// Print a unified diff of every patched file
    #[arg(long, env = "SWEEP_SHOW_DIFF")]
    show_diff: bool,

    /// GitHub token (required unless --dry-run)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

impl Cli {
    fn into_config(self) -> SweepConfig {
        let mut config = SweepConfig::new(self.org, self.old, self.new)
            .branch_prefix(self.branch_prefix)
            .limit(self.limit)
            .only_public(self.only_public)
            .include_archived(self.include_archived)
            .repos(
                self.repos
                    .into_iter()
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
            )
            .dry_run(self.dry_run)
            .delay(Duration::from_secs(self.sleep))
            .confirm(self.confirm)
            .search(self.search)
            .convert_license_links(self.convert_license_links)
            .show_diff(self.show_diff);
        if let Some(token) = self.token {
            config = config.token(token);
        }
        config
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let api_url = cli.api_url.clone();
    let config = cli
        .into_config()
        .validate()
        .context("Invalid configuration")?;

    let scanner = Scanner::detect(config.search).context("No usable search tool")?;
    info!(
        org = %config.org,
        old = %config.old_url,
        new = %config.new_url,
        branch = %config.patch_branch(),
        search = scanner.strategy_name(),
        "configured"
    );

    let client = GitHubClient::with_base_url(config.token.clone(), api_url)
        .context("Failed to create GitHub client")?;
    let pipeline = Pipeline::new(&config, &client, &scanner).context("Failed to create workspace")?;

    let summary = pipeline
        .run()
        .with_context(|| format!("Failed to list repositories of {}", config.org))?;

    println!("\nSummary:");
    println!("{}", summary);

    Ok(())
}

/// Compact single-line logs, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["url-sweep", "--dry-run"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.org, "EutropicAI");
        assert_eq!(config.old_url, "https://github.com/TensoRaws");
        assert_eq!(config.limit, 1000);
        assert_eq!(config.delay, Duration::from_secs(2));
        assert!(config.dry_run);
    }

    #[test]
    fn test_repos_are_comma_separated() {
        let cli =
            Cli::try_parse_from(["url-sweep", "--repos", "AnimeSR, ccrestoration", "--search", "walk"])
                .unwrap();
        let config = cli.into_config();
        assert_eq!(config.repos, vec!["AnimeSR", "ccrestoration"]);
        assert_eq!(config.search, SearchStrategy::Walk);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

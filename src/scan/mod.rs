//! Occurrence scanning.
//!
//! A scan answers one question: which text files under a working tree
//! contain a literal string? The search itself is delegated to an
//! [`OccurrenceSearch`] strategy. Whatever strategy runs, its raw hits are
//! filtered through the same [`Exclusions`] and binary sniffing, so every
//! strategy reports the same paths for the same tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use org_url_sweep::scan::{Scanner, SearchStrategy};
//! use std::path::Path;
//!
//! let scanner = Scanner::detect(SearchStrategy::Auto)?;
//! let report = scanner.scan(Path::new("./checkout"), "https://github.com/TensoRaws")?;
//! for hit in &report.hits {
//!     println!("{} ({} hit(s))", hit.path.display(), hit.occurrences);
//! }
//! # Ok::<(), org_url_sweep::error::SweepError>(())
//! ```

mod exclude;
mod git_grep;
mod ripgrep;
mod walk;

pub use exclude::{
    looks_binary, Exclusions, BINARY_EXTENSIONS, MAX_FILE_SIZE, SKIP_DIRS, SNIFF_LEN,
};
pub use git_grep::GitGrepSearch;
pub use ripgrep::RipgrepSearch;
pub use walk::WalkSearch;

use crate::error::{Result, SweepError};
use crate::transform::TextEncoding;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Finds files containing a literal under an exclusion set.
pub trait OccurrenceSearch {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns relative paths of files that may contain `needle`.
    ///
    /// Implementations may over-report; the [`Scanner`] re-checks every path.
    fn candidates(
        &self,
        root: &Path,
        needle: &str,
        exclusions: &Exclusions,
    ) -> Result<Vec<PathBuf>>;
}

/// Which search strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Prefer ripgrep, then git grep, then the in-process walk.
    #[default]
    Auto,
    Ripgrep,
    GitGrep,
    Walk,
}

impl FromStr for SearchStrategy {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "ripgrep" | "rg" => Ok(Self::Ripgrep),
            "git-grep" | "git" => Ok(Self::GitGrep),
            "walk" => Ok(Self::Walk),
            other => Err(SweepError::InvalidConfig(format!(
                "unknown search strategy '{}' (expected auto, ripgrep, git-grep or walk)",
                other
            ))),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Ripgrep => "ripgrep",
            Self::GitGrep => "git-grep",
            Self::Walk => "walk",
        };
        f.write_str(name)
    }
}

/// One file known to contain the needle or a convertible LICENSE link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    /// Path relative to the scanned root.
    pub path: PathBuf,
    pub occurrences: usize,
    pub license_links: usize,
}

/// The ordered, deduplicated result of scanning one working tree.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub hits: Vec<ScanHit>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Relative paths in report order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.hits.iter().map(|h| h.path.clone()).collect()
    }

    pub fn total_occurrences(&self) -> usize {
        self.hits.iter().map(|h| h.occurrences).sum()
    }

    pub fn total_license_links(&self) -> usize {
        self.hits.iter().map(|h| h.license_links).sum()
    }
}

/// Runs a search strategy and normalizes its output.
pub struct Scanner {
    search: Box<dyn OccurrenceSearch>,
    exclusions: Exclusions,
}

impl Scanner {
    /// Creates a scanner from an explicit strategy and the standard exclusions.
    pub fn new(search: Box<dyn OccurrenceSearch>) -> Result<Self> {
        Ok(Self {
            search,
            exclusions: Exclusions::standard()?,
        })
    }

    /// Picks a strategy by checking which tools are installed.
    ///
    /// Requesting a specific tool that is not installed is an error.
    pub fn detect(strategy: SearchStrategy) -> Result<Self> {
        let search: Box<dyn OccurrenceSearch> = match strategy {
            SearchStrategy::Auto => {
                if let Some(rg) = RipgrepSearch::detect() {
                    Box::new(rg)
                } else if let Some(git) = GitGrepSearch::detect() {
                    Box::new(git)
                } else {
                    Box::new(WalkSearch)
                }
            }
            SearchStrategy::Ripgrep => Box::new(RipgrepSearch::detect().ok_or_else(|| {
                SweepError::MissingDependency { tool: "rg".into() }
            })?),
            SearchStrategy::GitGrep => Box::new(GitGrepSearch::detect().ok_or_else(|| {
                SweepError::MissingDependency { tool: "git".into() }
            })?),
            SearchStrategy::Walk => Box::new(WalkSearch),
        };
        Self::new(search)
    }

    /// Name of the strategy in use.
    pub fn strategy_name(&self) -> &'static str {
        self.search.name()
    }

    /// Scans `root` for files containing `needle`.
    pub fn scan(&self, root: &Path, needle: &str) -> Result<ScanReport> {
        let mut candidates = self.search.candidates(root, needle, &self.exclusions)?;
        candidates.sort();
        candidates.dedup();

        debug!(
            strategy = self.search.name(),
            candidates = candidates.len(),
            "search finished"
        );

        let mut hits = Vec::new();
        for rel in candidates {
            if !self.exclusions.admits(root, &rel) {
                continue;
            }
            let Ok(bytes) = fs::read(root.join(&rel)) else {
                continue;
            };
            let occurrences = count_occurrences(&bytes, needle.as_bytes());
            if occurrences > 0 {
                hits.push(ScanHit {
                    path: rel,
                    occurrences,
                    license_links: 0,
                });
            }
        }

        Ok(ScanReport { hits })
    }

    /// Adds files where `pattern` matches to `report`, counted as LICENSE links.
    ///
    /// The pattern is not a literal, so this always walks in-process, with the
    /// same exclusions as every strategy.
    pub fn scan_license_links(&self, root: &Path, pattern: &Regex, report: &mut ScanReport) {
        for rel in walk::admitted_files(root, &self.exclusions) {
            let Ok(bytes) = fs::read(root.join(&rel)) else {
                continue;
            };
            let (text, _) = TextEncoding::decode(&bytes);
            let links = pattern.find_iter(&text).count();
            if links == 0 {
                continue;
            }
            match report.hits.iter_mut().find(|h| h.path == rel) {
                Some(hit) => hit.license_links = links,
                None => report.hits.push(ScanHit {
                    path: rel,
                    occurrences: 0,
                    license_links: links,
                }),
            }
        }
        report.hits.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if &haystack[i..i + needle.len()] == needle {
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}

/// Turns tool output separated by NULs into relative paths.
pub(crate) fn split_nul_paths(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|b| *b == 0)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let raw = String::from_utf8_lossy(chunk);
            let path = PathBuf::from(raw.into_owned());
            match path.strip_prefix(".") {
                Ok(stripped) => stripped.to_path_buf(),
                Err(_) => path,
            }
        })
        .collect()
}

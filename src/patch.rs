//! Applying the URL rewrite to a repository's candidate files.

use crate::config::SweepConfig;
use crate::diff::{unified_diff, DiffSummary};
use crate::error::Result;
use crate::transform::{FileChange, TextEncoding, TextTransform, TransformBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The result of patching one working tree.
#[derive(Debug, Default)]
pub struct PatchResult {
    /// Files whose content changed.
    pub changes: Vec<FileChange>,
    pub summary: DiffSummary,
    /// URL occurrences rewritten across all changed files.
    pub replacements: usize,
    /// LICENSE links rewritten across all changed files.
    pub license_links: usize,
    /// Files that could not be read or written back.
    pub failures: Vec<(PathBuf, String)>,
}

impl PatchResult {
    pub fn files_modified(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Unified diff of all changes, paths relative to `root`.
    pub fn diff(&self, root: &Path) -> String {
        self.changes
            .iter()
            .map(|c| {
                let rel = c.path.strip_prefix(root).unwrap_or(&c.path);
                unified_diff(&c.original, &c.transformed, rel)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rewrites candidate files under a repository root.
pub struct Patcher {
    root: PathBuf,
    transforms: TransformBuilder,
    dry_run: bool,
}

impl Patcher {
    /// Creates a patcher with explicit transforms.
    pub fn new(root: impl Into<PathBuf>, transforms: TransformBuilder) -> Self {
        Self {
            root: root.into(),
            transforms,
            dry_run: false,
        }
    }

    /// Creates the patcher a run uses for one repository.
    ///
    /// The URL replacement always runs first; the LICENSE link rewrite, when
    /// enabled, runs second on the already-rewritten text.
    pub fn for_repo(root: impl Into<PathBuf>, config: &SweepConfig, repo_name: &str) -> Result<Self> {
        let mut transforms = TransformBuilder::new().replace_literal(&config.old_url, &config.new_url);
        if config.convert_license_links {
            transforms = transforms.custom(TextTransform::license_links(
                &config.old_url,
                &config.new_url,
                repo_name,
            )?);
        }
        debug!(repo = repo_name, transforms = ?transforms.describe(), "patcher ready");
        Ok(Self::new(root, transforms))
    }

    /// Computes changes without writing them.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Patches the given paths (relative to the root).
    pub fn apply(&self, rel_paths: &[PathBuf]) -> Result<PatchResult> {
        let mut result = PatchResult::default();

        for rel in rel_paths {
            let path = self.root.join(rel);
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(file = %rel.display(), error = %e, "cannot read file, skipping");
                    result.failures.push((rel.clone(), e.to_string()));
                    continue;
                }
            };

            let (original, encoding) = TextEncoding::decode(&bytes);
            let applied = self.transforms.apply(&original, rel)?;

            let change = FileChange {
                path,
                encoding,
                original,
                transformed: applied.text,
                counts: applied.counts,
            };
            if !change.is_modified() {
                continue;
            }

            if !self.dry_run
                && let Err(e) = change.apply()
            {
                warn!(file = %rel.display(), error = %e, "cannot write file, skipping");
                result.failures.push((rel.clone(), e.to_string()));
                continue;
            }

            debug!(file = %rel.display(), encoding = %change.encoding, "patched");
            result
                .summary
                .merge(&DiffSummary::from_diff(&change.original, &change.transformed));
            result.replacements += change.counts.first().copied().unwrap_or(0);
            result.license_links += change.counts.get(1).copied().unwrap_or(0);
            result.changes.push(change);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OLD: &str = "https://github.com/TensoRaws";
    const NEW: &str = "https://github.com/EutropicAI";

    fn config() -> SweepConfig {
        SweepConfig::new("EutropicAI", OLD, NEW)
    }

    #[test]
    fn test_patch_rewrites_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("README.md"),
            "See https://github.com/TensoRaws/AnimeSR for details.",
        )
        .unwrap();

        let patcher = Patcher::for_repo(dir.path(), &config(), "AnimeSR").unwrap();
        let result = patcher.apply(&[PathBuf::from("README.md")]).unwrap();

        assert_eq!(result.files_modified(), 1);
        assert_eq!(result.replacements, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "See https://github.com/EutropicAI/AnimeSR for details."
        );
    }

    #[test]
    fn test_patch_keeps_latin1_bytes() {
        let dir = TempDir::new().unwrap();
        let mut bytes = b"caf\xe9 ".to_vec();
        bytes.extend_from_slice(OLD.as_bytes());
        bytes.extend_from_slice(b" \xff\n");
        fs::write(dir.path().join("legacy.txt"), &bytes).unwrap();

        let patcher = Patcher::for_repo(dir.path(), &config(), "repo").unwrap();
        let result = patcher.apply(&[PathBuf::from("legacy.txt")]).unwrap();

        let mut expected = b"caf\xe9 ".to_vec();
        expected.extend_from_slice(NEW.as_bytes());
        expected.extend_from_slice(b" \xff\n");
        assert_eq!(result.changes[0].encoding, TextEncoding::Latin1);
        assert_eq!(fs::read(dir.path().join("legacy.txt")).unwrap(), expected);
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), OLD).unwrap();

        let patcher = Patcher::for_repo(dir.path(), &config(), "repo")
            .unwrap()
            .dry_run();
        let result = patcher.apply(&[PathBuf::from("a.txt")]).unwrap();

        assert_eq!(result.files_modified(), 1);
        assert!(result.diff(dir.path()).contains(&format!("+{}", NEW)));
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), OLD);
    }

    #[test]
    fn test_identical_pair_produces_no_change() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), OLD).unwrap();

        let cfg = SweepConfig::new("org", OLD, OLD);
        let result = Patcher::for_repo(dir.path(), &cfg, "repo")
            .unwrap()
            .apply(&[PathBuf::from("a.txt")])
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn test_missing_file_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), OLD).unwrap();

        let result = Patcher::for_repo(dir.path(), &config(), "repo")
            .unwrap()
            .apply(&[PathBuf::from("gone.txt"), PathBuf::from("a.txt")])
            .unwrap();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.files_modified(), 1);
    }

    #[test]
    fn test_license_links_counted_separately() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("README.md"),
            "[License](https://github.com/TensoRaws/AnimeSR/blob/main/LICENSE)\n",
        )
        .unwrap();

        let cfg = config().convert_license_links(true);
        let result = Patcher::for_repo(dir.path(), &cfg, "AnimeSR")
            .unwrap()
            .apply(&[PathBuf::from("README.md")])
            .unwrap();

        assert_eq!(result.replacements, 1);
        assert_eq!(result.license_links, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "[License](./LICENSE)\n"
        );
    }
}

//! In-process search over the working tree.

use super::{count_occurrences, Exclusions, OccurrenceSearch};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks the tree and reads every admitted file.
///
/// Needs no external tool, so it is the last resort when detecting tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkSearch;

impl OccurrenceSearch for WalkSearch {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn candidates(
        &self,
        root: &Path,
        needle: &str,
        exclusions: &Exclusions,
    ) -> Result<Vec<PathBuf>> {
        let needle = needle.as_bytes();
        let mut matched = Vec::new();

        for rel in admitted_files(root, exclusions) {
            // Content check last, it is the expensive part
            if let Ok(bytes) = fs::read(root.join(&rel))
                && count_occurrences(&bytes, needle) > 0
            {
                matched.push(rel);
            }
        }

        Ok(matched)
    }
}

/// Relative paths of every file under `root` that `exclusions` admits.
pub(crate) fn admitted_files<'a>(
    root: &'a Path,
    exclusions: &'a Exclusions,
) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(move |entry| {
            // Never prune the root itself, only directories below it.
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| exclusions.is_skipped_dir(name))
        })
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| {
            let rel = entry.path().strip_prefix(root).ok()?.to_path_buf();
            exclusions.admits(root, &rel).then_some(rel)
        })
}

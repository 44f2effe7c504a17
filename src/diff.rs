//! Diff generation for previewing patches.

use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

/// Generates a unified diff between two strings.
pub fn unified_diff(original: &str, modified: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    let _ = writeln!(&mut output, "--- a/{}", path.display());
    let _ = writeln!(&mut output, "+++ b/{}", path.display());

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            let _ = writeln!(&mut output);
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };

                let _ = write!(&mut output, "{}{}", sign, change.value());
            }
        }
    }

    output
}

/// Line-level summary of a patch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Creates a summary from original and modified content.
    pub fn from_diff(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_lines(original, modified);
        let mut insertions = 0;
        let mut deletions = 0;

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => insertions += 1,
                ChangeTag::Delete => deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        Self {
            files_changed: if insertions > 0 || deletions > 0 { 1 } else { 0 },
            insertions,
            deletions,
        }
    }

    /// Combines two summaries.
    pub fn merge(&mut self, other: &DiffSummary) {
        self.files_changed += other.files_changed;
        self.insertions += other.insertions;
        self.deletions += other.deletions;
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} file(s) changed, {} insertions(+), {} deletions(-)",
            self.files_changed, self.insertions, self.deletions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_changed_lines() {
        let summary = DiffSummary::from_diff("a\nb\nc\n", "a\nB\nc\n");
        assert_eq!(
            summary,
            DiffSummary {
                files_changed: 1,
                insertions: 1,
                deletions: 1
            }
        );
        assert_eq!(DiffSummary::from_diff("a\n", "a\n").files_changed, 0);
    }

    #[test]
    fn test_unified_diff_marks_lines() {
        let diff = unified_diff("old\n", "new\n", Path::new("README.md"));
        assert!(diff.starts_with("--- a/README.md\n+++ b/README.md\n"));
        assert!(diff.contains("-old\n"));
        assert!(diff.contains("+new\n"));
    }
}

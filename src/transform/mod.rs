//! Text transformations applied to matched files.

pub mod encoding;
pub mod text;

pub use encoding::TextEncoding;
pub use text::{license_link_pattern, TextTransform};

use crate::error::{Result, SweepError};
use std::path::{Path, PathBuf};

/// The output of one transformation pass over a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Number of replacements made.
    pub count: usize,
}

/// A transformation that can be applied to file contents.
pub trait Transform: Send + Sync {
    /// Applies the transformation to the given text.
    fn apply(&self, source: &str, path: &Path) -> Result<Rewrite>;

    /// Returns a description of the transformation.
    fn describe(&self) -> String;
}

/// Runs several transformations in order.
#[derive(Default)]
pub struct TransformBuilder {
    transforms: Vec<Box<dyn Transform>>,
}

/// Final text plus one replacement count per transformation, in order.
#[derive(Debug, Clone)]
pub struct Applied {
    pub text: String,
    pub counts: Vec<usize>,
}

impl TransformBuilder {
    /// Creates a new transform builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal string replacement.
    pub fn replace_literal(mut self, needle: &str, replacement: &str) -> Self {
        self.transforms
            .push(Box::new(TextTransform::replace_literal(needle, replacement)));
        self
    }

    /// Adds a custom transformation.
    pub fn custom<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Applies all transformations to the source in order.
    pub fn apply(&self, source: &str, path: &Path) -> Result<Applied> {
        let mut text = source.to_string();
        let mut counts = Vec::with_capacity(self.transforms.len());
        for transform in &self.transforms {
            let rewrite = transform.apply(&text, path)?;
            text = rewrite.text;
            counts.push(rewrite.count);
        }
        Ok(Applied { text, counts })
    }

    /// Returns descriptions of all transformations.
    pub fn describe(&self) -> Vec<String> {
        self.transforms.iter().map(|t| t.describe()).collect()
    }
}

/// A pending rewrite of one file.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    pub original: String,
    pub transformed: String,
    pub counts: Vec<usize>,
}

impl FileChange {
    /// Returns true if the content was modified.
    pub fn is_modified(&self) -> bool {
        self.original != self.transformed
    }

    /// Writes the transformed content back in the file's original encoding.
    pub fn apply(&self) -> Result<()> {
        if !self.is_modified() {
            return Ok(());
        }
        let bytes = self
            .encoding
            .encode(&self.transformed)
            .ok_or_else(|| SweepError::Encoding {
                path: self.path.clone(),
                message: format!("rewritten text does not fit {}", self.encoding),
            })?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_counts_each_transform() {
        let builder = TransformBuilder::new()
            .replace_literal("a", "b")
            .replace_literal("b", "c");

        let applied = builder.apply("aab", Path::new("x.txt")).unwrap();

        assert_eq!(applied.text, "ccc");
        assert_eq!(applied.counts, vec![2, 3]);
        assert_eq!(builder.describe().len(), 2);
    }

    #[test]
    fn test_unencodable_change_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("legacy.txt");
        std::fs::write(&path, [b'c', b'a', b'f', 0xE9]).unwrap();

        let change = FileChange {
            path: path.clone(),
            encoding: TextEncoding::Latin1,
            original: "café".into(),
            transformed: "caf\u{1F600}".into(),
            counts: vec![1],
        };

        assert!(matches!(change.apply(), Err(SweepError::Encoding { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), vec![b'c', b'a', b'f', 0xE9]);
    }
}

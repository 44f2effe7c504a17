//! Path classes that are never scanned or patched.

use crate::error::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Directories skipped wherever they appear in a path.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "dist",
    "build",
    ".venv",
    ".mypy_cache",
    ".pytest_cache",
    "__pycache__",
    "out",
    "target",
];

/// Extensions treated as binary without looking at the content.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "pdf", "zip", "tar", "gz", "tgz", "7z", "rar",
    "woff", "woff2", "ttf", "otf", "ico", "mp4", "mp3", "avi", "mov", "mkv", "exe", "dll", "so",
    "dylib", "bin", "class", "o", "a", "lib", "obj", "pkl", "pt", "onnx", "pb",
];

/// Files above this size are skipped.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Number of leading bytes inspected for a NUL when sniffing for binary content.
pub const SNIFF_LEN: usize = 4096;

/// The exclusion set shared by every search strategy.
#[derive(Clone)]
pub struct Exclusions {
    dirs: Vec<String>,
    extensions: Vec<String>,
    binary_globs: GlobSet,
    max_size: u64,
}

impl Exclusions {
    /// Builds the standard exclusion set.
    pub fn standard() -> Result<Self> {
        Self::new(
            SKIP_DIRS.iter().map(|d| d.to_string()),
            BINARY_EXTENSIONS.iter().map(|e| e.to_string()),
            MAX_FILE_SIZE,
        )
    }

    /// Builds an exclusion set from explicit directory names and extensions.
    pub fn new(
        dirs: impl IntoIterator<Item = String>,
        extensions: impl IntoIterator<Item = String>,
        max_size: u64,
    ) -> Result<Self> {
        let dirs: Vec<String> = dirs.into_iter().collect();
        let extensions: Vec<String> = extensions.into_iter().collect();

        let mut builder = GlobSetBuilder::new();
        for ext in &extensions {
            builder.add(
                GlobBuilder::new(&format!("*.{}", ext))
                    .case_insensitive(true)
                    .literal_separator(false)
                    .build()?,
            );
        }

        Ok(Self {
            dirs,
            extensions,
            binary_globs: builder.build()?,
            max_size,
        })
    }

    /// Returns true if the directory name is pruned. Names compare case-sensitively.
    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d == name)
    }

    /// Returns true if the relative path is excluded by directory or extension.
    pub fn excludes_path(&self, rel: &Path) -> bool {
        let in_skipped_dir = rel
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .any(|c| c.as_os_str().to_str().is_some_and(|s| self.is_skipped_dir(s)))
            })
            .unwrap_or(false);

        in_skipped_dir || self.binary_globs.is_match(rel)
    }

    /// Returns true if the file under `root` may be scanned and patched.
    pub fn admits(&self, root: &Path, rel: &Path) -> bool {
        if self.excludes_path(rel) {
            return false;
        }

        let path = root.join(rel);
        match path.metadata() {
            Ok(meta) if meta.is_file() && meta.len() <= self.max_size => {}
            _ => return false,
        }

        !looks_binary(&path)
    }

    /// ripgrep arguments: case-sensitive `--glob` for directories and
    /// case-insensitive `--iglob` for extensions.
    pub fn ripgrep_args(&self) -> Vec<String> {
        let dirs = self
            .dirs
            .iter()
            .flat_map(|d| ["--glob".to_string(), format!("!**/{}/**", d)]);
        let exts = self
            .extensions
            .iter()
            .flat_map(|e| ["--iglob".to_string(), format!("!*.{}", e)]);
        dirs.chain(exts).collect()
    }

    /// Exclude pathspecs in git syntax.
    pub fn git_pathspecs(&self) -> Vec<String> {
        self.dirs
            .iter()
            .map(|d| format!(":(exclude,glob)**/{}/**", d))
            .chain(
                self.extensions
                    .iter()
                    .map(|e| format!(":(exclude,glob,icase)**/*.{}", e)),
            )
            .collect()
    }
}

/// Sniffs the first [`SNIFF_LEN`] bytes for a NUL.
///
/// This is the only binary check: the external tools are run in text mode
/// and their hits pass through here. Unreadable files count as binary.
pub fn looks_binary(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return true;
    };
    let mut chunk = Vec::with_capacity(SNIFF_LEN);
    if file.take(SNIFF_LEN as u64).read_to_end(&mut chunk).is_err() {
        return true;
    }
    chunk.contains(&0)
}

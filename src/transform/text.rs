//! Literal and regex text replacement.

use super::{Rewrite, Transform};
use crate::error::{Result, SweepError};
use regex::Regex;
use std::path::Path;
use url::Url;

/// Text-based replacement transform.
pub struct TextTransform {
    kind: TextTransformKind,
}

enum TextTransformKind {
    Replace { pattern: Regex, replacement: String },
    ReplaceLiteral { needle: String, replacement: String },
}

impl TextTransform {
    /// Creates a literal string replacement transform.
    ///
    /// The needle is never interpreted as a pattern.
    pub fn replace_literal(needle: &str, replacement: &str) -> Self {
        Self {
            kind: TextTransformKind::ReplaceLiteral {
                needle: needle.to_string(),
                replacement: replacement.to_string(),
            },
        }
    }

    /// Creates a replacement transform from a pre-compiled regex.
    pub fn replace_regex(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            kind: TextTransformKind::Replace {
                pattern,
                replacement: replacement.into(),
            },
        }
    }

    /// Rewrites absolute LICENSE links of `repo_name` to `./LICENSE`.
    ///
    /// Only Markdown links whose label mentions "license" or "licence" are
    /// touched. Both the owner in `old_url` and the owner in `new_url` are
    /// recognized, for `blob` links on the URL's host and, on github.com, for
    /// `raw.githubusercontent.com` links.
    pub fn license_links(old_url: &str, new_url: &str, repo_name: &str) -> Result<Self> {
        let pattern = license_link_pattern(old_url, new_url, repo_name)?;
        Ok(Self::replace_regex(pattern, "[${1}](./LICENSE)"))
    }
}

/// The regex behind [`TextTransform::license_links`]; group 1 is the label.
pub fn license_link_pattern(old_url: &str, new_url: &str, repo_name: &str) -> Result<Regex> {
    let (host, old_owner) = host_and_owner(old_url)?;
    let (_, new_owner) = host_and_owner(new_url)?;

    let owners = format!("(?:{}|{})", regex::escape(&old_owner), regex::escape(&new_owner));
    let repo = regex::escape(repo_name);
    let label = r"\[([^\]]*?licen[cs]e[^\]]*?)\]";
    let file = r"(?:LICENSE|LICENCE)(?:\.md)?";

    let blob = format!(
        r"https://{}/{}/{}/blob/[A-Za-z0-9._\-/]+/{}",
        regex::escape(&host),
        owners,
        repo,
        file
    );

    let target = if host == "github.com" {
        let raw = format!(
            r"https://raw\.githubusercontent\.com/{}/{}/[A-Za-z0-9._\-/]+/{}",
            owners, repo, file
        );
        format!("(?:{}|{})", blob, raw)
    } else {
        blob
    };

    Ok(Regex::new(&format!(r"(?i){}\({}\)", label, target))?)
}

/// Splits `https://host/owner[/...]` into host and the owner segment.
fn host_and_owner(raw: &str) -> Result<(String, String)> {
    let url = Url::parse(raw)?;
    let host = url
        .host_str()
        .ok_or_else(|| SweepError::InvalidConfig(format!("URL '{}' has no host", raw)))?
        .to_string();
    let owner = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        .ok_or_else(|| SweepError::InvalidConfig(format!("URL '{}' names no owner", raw)))?
        .to_string();
    Ok((host, owner))
}

impl Transform for TextTransform {
    fn apply(&self, source: &str, _path: &Path) -> Result<Rewrite> {
        match &self.kind {
            TextTransformKind::Replace {
                pattern,
                replacement,
            } => {
                let count = pattern.find_iter(source).count();
                let text = if count == 0 {
                    source.to_string()
                } else {
                    pattern.replace_all(source, replacement.as_str()).into_owned()
                };
                Ok(Rewrite { text, count })
            }
            TextTransformKind::ReplaceLiteral {
                needle,
                replacement,
            } => {
                if needle.is_empty() {
                    return Ok(Rewrite {
                        text: source.to_string(),
                        count: 0,
                    });
                }
                let count = source.matches(needle.as_str()).count();
                let text = if count == 0 {
                    source.to_string()
                } else {
                    source.replace(needle.as_str(), replacement)
                };
                Ok(Rewrite { text, count })
            }
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            TextTransformKind::Replace {
                pattern,
                replacement,
            } => format!(
                "Replace pattern '{}' with '{}'",
                pattern.as_str(),
                replacement
            ),
            TextTransformKind::ReplaceLiteral {
                needle,
                replacement,
            } => format!("Replace literal '{}' with '{}'", needle, replacement),
        }
    }
}

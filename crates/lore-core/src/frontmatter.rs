//! Frontmatter parsing.
//!
//! Handles the `---` delimited metadata block at the top of checklists
//! and source notes. Format:
//! ```markdown
//! ---
//! version: 3
//! updated: 2025-02-10
//! description: "Review pull requests"
//! tags: [security, "api design"]
//! ---
//! # Code Review Checklist
//! ```
//!
//! This is deliberately not YAML: each line is a flat `key: value` pair,
//! and a value wrapped in `[...]` is a comma separated list.

use std::collections::BTreeMap;

/// A single frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    /// The value as a scalar string, if it is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Scalar(s) => Some(s),
            FrontmatterValue::List(_) => None,
        }
    }
}

/// Parsed frontmatter metadata, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter(BTreeMap<String, FrontmatterValue>);

impl Frontmatter {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.0.get(key)
    }

    /// Scalar value for `key`, or `None` if absent or a list.
    #[must_use]
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FrontmatterValue::as_scalar)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Whether a line is a frontmatter delimiter (`---`, trailing whitespace allowed).
#[must_use]
pub fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Split a document into its raw frontmatter block and body.
///
/// Returns `None` unless the first line is a delimiter and a later line
/// closes the block. The block excludes both delimiter lines; the body
/// starts right after the closing delimiter's newline.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let first_end = content.find('\n')?;
    if !is_delimiter(&content[..first_end]) {
        return None;
    }

    let mut pos = first_end + 1;
    while pos < content.len() {
        let rest = &content[pos..];
        let (line, next) = match rest.find('\n') {
            Some(i) => (&rest[..i], pos + i + 1),
            None => (rest, content.len()),
        };
        if is_delimiter(line) {
            return Some((&content[first_end + 1..pos], &content[next..]));
        }
        pos = next;
    }
    None
}

/// Parse frontmatter from a document.
///
/// Returns `(metadata, body)`. Documents without a complete frontmatter
/// block yield empty metadata and the content unchanged.
#[must_use]
pub fn parse_frontmatter(content: &str) -> (Frontmatter, &str) {
    let Some((block, body)) = split_frontmatter(content) else {
        return (Frontmatter::default(), content);
    };

    let mut fields = BTreeMap::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), parse_value(value));
    }

    (Frontmatter(fields), body)
}

fn parse_value(raw: &str) -> FrontmatterValue {
    let value = unquote(raw.trim());
    match value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
    {
        Some(inner) => FrontmatterValue::List(
            inner
                .split(',')
                .map(|item| unquote(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        ),
        None => FrontmatterValue::Scalar(value.to_string()),
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"').trim_matches('\'')
}

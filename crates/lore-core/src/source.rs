//! Source identifiers.
//!
//! Books are identified by a zero-padded number (`07`), articles by the
//! same number with an `a` prefix (`a07`). The two namespaces are
//! independent: `07` and `a07` are different sources.

use std::fmt;

/// Which partition of the catalog a source lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Book,
    Article,
}

impl SourceKind {
    /// Classify a caller-supplied source type. `article` and `blog` are
    /// article-like; everything else is filed as a book.
    #[must_use]
    pub fn from_source_type(source_type: &str) -> Self {
        match source_type.trim().to_ascii_lowercase().as_str() {
            "article" | "blog" => SourceKind::Article,
            _ => SourceKind::Book,
        }
    }

    /// Routing list that new sources of this kind are appended to.
    #[must_use]
    pub fn routing_list(self) -> &'static str {
        match self {
            SourceKind::Book => "secondary_sources",
            SourceKind::Article => "anthropic_articles",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Book => "book",
            SourceKind::Article => "article",
        }
    }
}

/// A parsed book or article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId {
    pub kind: SourceKind,
    pub number: u32,
}

impl SourceId {
    #[must_use]
    pub fn new(kind: SourceKind, number: u32) -> Self {
        Self { kind, number }
    }

    /// Parse `NN` or `aNN`. Any run of ASCII digits is accepted, so
    /// `7` and `007` both name book `07`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (kind, digits) = match raw.strip_prefix('a') {
            Some(rest) => (SourceKind::Article, rest),
            None => (SourceKind::Book, raw),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number = digits.parse().ok()?;
        Some(Self { kind, number })
    }

    /// The zero-padded numeric part used in filenames (`07` for `a07`).
    #[must_use]
    pub fn digits(&self) -> String {
        format!("{:02}", self.number)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SourceKind::Book => write!(f, "{:02}", self.number),
            SourceKind::Article => write!(f, "a{:02}", self.number),
        }
    }
}

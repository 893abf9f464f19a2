//! Checklist detail levels.

use std::fmt;

/// How much of a checklist to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DetailLevel {
    /// Title, headings and checklist items only.
    Brief,
    /// Everything except anti-pattern style sections.
    #[default]
    Standard,
    /// The raw document.
    Detailed,
}

impl DetailLevel {
    /// Parse a level name. Unrecognized names fall back to
    /// [`DetailLevel::Detailed`] so an unknown value never hides content.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "brief" => DetailLevel::Brief,
            "standard" => DetailLevel::Standard,
            _ => DetailLevel::Detailed,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DetailLevel::Brief => "brief",
            DetailLevel::Standard => "standard",
            DetailLevel::Detailed => "detailed",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

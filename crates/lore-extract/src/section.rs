//! Named section extraction.
//!
//! Source notes do not share exact heading names, so each [`SectionKey`]
//! maps to an ordered list of heading phrases. Adding a synonym is a
//! change to [`SECTION_PHRASES`], not to the matching code.

use crate::outline::Outline;

/// Sentinel section key returning the whole document.
pub const FULL: &str = "full";

/// The fixed set of named sections a source note can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    KeyIdeas,
    Patterns,
    Tradeoffs,
    Pitfalls,
    Framings,
    Applicability,
}

impl SectionKey {
    pub const ALL: [SectionKey; 6] = [
        SectionKey::KeyIdeas,
        SectionKey::Patterns,
        SectionKey::Tradeoffs,
        SectionKey::Pitfalls,
        SectionKey::Framings,
        SectionKey::Applicability,
    ];

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::KeyIdeas => "key_ideas",
            SectionKey::Patterns => "patterns",
            SectionKey::Tradeoffs => "tradeoffs",
            SectionKey::Pitfalls => "pitfalls",
            SectionKey::Framings => "framings",
            SectionKey::Applicability => "applicability",
        }
    }

    /// Heading phrases recognized for this key.
    #[must_use]
    pub fn phrases(self) -> &'static [Phrase] {
        SECTION_PHRASES
            .iter()
            .find(|(key, _)| *key == self)
            .map(|(_, phrases)| *phrases)
            .unwrap_or(&[])
    }

    /// Whether a heading title matches any phrase for this key.
    #[must_use]
    pub fn matches(self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.phrases().iter().any(|p| p.matches(&title))
    }
}

/// A case-insensitive heading matcher. Phrase text is stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    /// The phrase appears anywhere in the heading.
    Contains(&'static str),
    /// The phrase appears and is not followed by a word character.
    Word(&'static str),
    /// The prefix, one or more digits, then a space (`The 12 Factors`).
    Numbered(&'static str),
}

impl Phrase {
    /// Match against an already lowercased heading title.
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        match *self {
            Phrase::Contains(phrase) => title.contains(phrase),
            Phrase::Word(word) => title.match_indices(word).any(|(at, _)| {
                title[at + word.len()..]
                    .chars()
                    .next()
                    .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
            }),
            Phrase::Numbered(prefix) => title.match_indices(prefix).any(|(at, _)| {
                let rest = &title[at + prefix.len()..];
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                digits > 0 && rest[digits..].starts_with(' ')
            }),
        }
    }
}

use Phrase::{Contains, Numbered, Word};

/// Heading synonyms per section key, in priority order.
pub static SECTION_PHRASES: &[(SectionKey, &[Phrase])] = &[
    (
        SectionKey::KeyIdeas,
        &[
            Contains("key ideas"),
            Contains("mental models"),
            Contains("core thesis"),
            Contains("core insight"),
            Contains("core pattern"),
            Contains("core principle"),
            Contains("core problem"),
            Contains("core finding"),
            Contains("core innovation"),
            Contains("core technique"),
            Contains("general principles"),
            Contains("overview"),
            Contains("what "),
            Word("note"),
            Contains("original key points"),
        ],
    ),
    (
        SectionKey::Patterns,
        &[
            Contains("patterns"),
            Contains("approaches"),
            Contains("design principles"),
            Contains("architecture"),
            Contains("workflow"),
            Numbered("the "),
        ],
    ),
    (
        SectionKey::Tradeoffs,
        &[
            Contains("tradeoffs"),
            Contains("tensions"),
            Contains("challenges"),
            Contains("limitations"),
            Contains("production challenges"),
        ],
    ),
    (
        SectionKey::Pitfalls,
        &[
            Contains("watch out"),
            Contains("what to watch"),
            Contains("pitfalls"),
            Contains("anti-pattern"),
            Contains("architectural limitations"),
        ],
    ),
    (SectionKey::Applicability, &[Contains("applicability")]),
    (
        SectionKey::Framings,
        &[
            Contains("key framings"),
            Contains("framings worth preserving"),
            Contains("key quotable"),
            Contains("key quotables"),
            Contains("key insight"),
        ],
    ),
];

/// Extract a named section by key.
///
/// `full` returns the whole document. Otherwise the first heading (in
/// document order) matching any of the key's phrases wins, and the section
/// runs to the next `## ` heading or end of document, trimmed. Unknown
/// keys and missing sections return `None`.
#[must_use]
pub fn extract_named_section<'a>(content: &'a str, section_key: &str) -> Option<&'a str> {
    if section_key == FULL {
        return Some(content);
    }
    extract_section(content, SectionKey::parse(section_key)?)
}

/// Typed form of [`extract_named_section`].
#[must_use]
pub fn extract_section(content: &str, key: SectionKey) -> Option<&str> {
    let outline = Outline::parse(content);
    outline
        .find_section(|title| key.matches(title))
        .map(|s| outline.section_text(s))
}

/// Heading predicate for checklist edits and lookups: the title contains
/// `heading`, case-insensitively and matched literally.
pub fn heading_matcher(heading: &str) -> impl Fn(&str) -> bool {
    let needle = heading.to_lowercase();
    move |title: &str| title.to_lowercase().contains(&needle)
}

/// Extract the first section whose heading contains `heading`
/// (case-insensitive, matched literally).
#[must_use]
pub fn extract_named_checklist_section<'a>(content: &'a str, heading: &str) -> Option<&'a str> {
    let outline = Outline::parse(content);
    outline
        .find_section(heading_matcher(heading))
        .map(|s| outline.section_text(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "# Book\n\n## Overview\nsummary\n\n## Key Ideas\nidea one\nidea two\n\n## Patterns\npattern\n## Pitfalls\nbad\n";

    #[test]
    fn tradeoffs_runs_to_next_heading() {
        let doc = "## Tradeoffs\nfoo\n## Pitfalls\nbar";
        assert_eq!(extract_named_section(doc, "tradeoffs"), Some("## Tradeoffs\nfoo"));
        assert_eq!(extract_named_section(doc, "pitfalls"), Some("## Pitfalls\nbar"));
    }

    #[test]
    fn key_ideas_stops_before_patterns() {
        let doc = "# T\n\n## Key Ideas\nbody text\nmore\n\n## Patterns\nx";
        assert_eq!(
            extract_named_section(doc, "key_ideas"),
            Some("## Key Ideas\nbody text\nmore")
        );
    }

    #[test]
    fn earliest_matching_heading_wins() {
        // "Overview" is a key_ideas synonym and comes before "Key Ideas".
        assert_eq!(
            extract_named_section(NOTE, "key_ideas"),
            Some("## Overview\nsummary")
        );
    }

    #[test]
    fn full_returns_document_unchanged() {
        assert_eq!(extract_named_section(NOTE, "full"), Some(NOTE));
    }

    #[test]
    fn unknown_key_and_missing_section_are_none() {
        assert_eq!(extract_named_section(NOTE, "summary"), None);
        assert_eq!(extract_named_section(NOTE, "framings"), None);
        assert_eq!(extract_named_section("no headings at all", "key_ideas"), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let doc = "## WATCH OUT FOR\nthis\n";
        assert_eq!(extract_named_section(doc, "pitfalls"), Some("## WATCH OUT FOR\nthis"));
    }

    #[test]
    fn word_and_numbered_phrases() {
        assert!(SectionKey::KeyIdeas.matches("Note on sources"));
        assert!(SectionKey::KeyIdeas.matches("Editor's Note"));
        assert!(!SectionKey::KeyIdeas.matches("Notebook"));
        assert!(SectionKey::Patterns.matches("The 12 Factors"));
        assert!(!SectionKey::Patterns.matches("The Factors"));
        assert!(!SectionKey::Patterns.matches("The 12"));
    }

    #[test]
    fn every_key_has_phrases() {
        for key in SectionKey::ALL {
            assert!(!key.phrases().is_empty(), "{} has no phrases", key.as_str());
            assert_eq!(SectionKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn heading_matcher_is_case_insensitive_substring() {
        let matches = heading_matcher("Security");
        assert!(matches("Security (OWASP)"));
        assert!(matches("app security"));
        assert!(!matches("Secure defaults"));
    }

    #[test]
    fn checklist_section_matches_literal_phrase() {
        let doc = "# C\n## Security (OWASP)\n- [ ] a\n## Testing\n- [ ] b";
        assert_eq!(
            extract_named_checklist_section(doc, "security (owasp)"),
            Some("## Security (OWASP)\n- [ ] a")
        );
        assert_eq!(extract_named_checklist_section(doc, "test"), Some("## Testing\n- [ ] b"));
        assert_eq!(extract_named_checklist_section(doc, "perf"), None);
    }
}

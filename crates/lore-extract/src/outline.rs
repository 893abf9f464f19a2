//! Line scanner for heading-delimited documents.
//!
//! A document is split on `\n` and every line is classified while a
//! small state machine walks it:
//!
//! ```text
//! BeforeFrontmatter --(line 0 is `---` and a closer exists)--> InFrontmatter
//! BeforeFrontmatter --(anything else)--> BetweenSections
//! InFrontmatter --(closing `---`)--> BetweenSections
//! BetweenSections | InSection(_) --(`## ` heading)--> InSection(n)
//! ```
//!
//! Lines keep their byte offset, so a [`Section`] maps straight back to a
//! slice of the original text. Joining [`Outline::lines`] with `\n`
//! reproduces the input exactly.

use lore_core::frontmatter::is_delimiter;

/// What a single line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A frontmatter `---` delimiter.
    Delimiter,
    /// A `# ` document title.
    Title,
    /// A `## ` section heading.
    Heading,
    /// A `- [ ]` or `- [x]` checklist item.
    Item,
    Text,
}

/// Where a line sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The frontmatter block, delimiters included.
    Frontmatter,
    /// After the frontmatter, before the first heading.
    Preamble,
    /// Inside the section with this index.
    Section(usize),
}

/// One classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    /// Byte offset of the line start in the original content.
    pub offset: usize,
    pub kind: LineKind,
    pub region: Region,
}

/// A `## ` section: its heading line through the line before the next heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// The full heading line, `## ` included.
    pub heading: &'a str,
    /// Heading text with the `##` marker and surrounding whitespace removed.
    pub title: &'a str,
    /// Index of the heading line.
    pub first_line: usize,
    /// Index one past the section's last line.
    pub end_line: usize,
    /// Byte range of the section in the original content.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    BeforeFrontmatter,
    InFrontmatter,
    BetweenSections,
    InSection(usize),
}

/// A scanned document.
#[derive(Debug, Clone)]
pub struct Outline<'a> {
    content: &'a str,
    lines: Vec<Line<'a>>,
    sections: Vec<Section<'a>>,
    frontmatter_end: Option<usize>,
}

impl<'a> Outline<'a> {
    #[must_use]
    pub fn parse(content: &'a str) -> Self {
        let mut raw = Vec::new();
        let mut offset = 0;
        for text in content.split('\n') {
            raw.push((text, offset));
            offset += text.len() + 1;
        }

        let frontmatter_end = match raw.first() {
            Some((first, _)) if is_delimiter(first) => raw
                .iter()
                .skip(1)
                .position(|(text, _)| is_delimiter(text))
                .map(|i| i + 1),
            _ => None,
        };

        let mut lines = Vec::with_capacity(raw.len());
        let mut headings: Vec<(usize, &'a str)> = Vec::new();
        let mut state = ScanState::BeforeFrontmatter;

        for (index, (text, offset)) in raw.into_iter().enumerate() {
            let (kind, region, next) = match state {
                ScanState::BeforeFrontmatter if frontmatter_end.is_some() => (
                    LineKind::Delimiter,
                    Region::Frontmatter,
                    ScanState::InFrontmatter,
                ),
                ScanState::InFrontmatter if Some(index) == frontmatter_end => (
                    LineKind::Delimiter,
                    Region::Frontmatter,
                    ScanState::BetweenSections,
                ),
                ScanState::InFrontmatter => {
                    (LineKind::Text, Region::Frontmatter, ScanState::InFrontmatter)
                }
                ScanState::BeforeFrontmatter | ScanState::BetweenSections => {
                    Self::body_line(text, index, None, &mut headings)
                }
                ScanState::InSection(current) => {
                    Self::body_line(text, index, Some(current), &mut headings)
                }
            };
            state = next;
            lines.push(Line {
                text,
                offset,
                kind,
                region,
            });
        }

        let sections = headings
            .iter()
            .enumerate()
            .map(|(i, &(first_line, title))| {
                let end_line = headings.get(i + 1).map_or(lines.len(), |&(next, _)| next);
                let end = lines
                    .get(end_line)
                    .map_or(content.len(), |line| line.offset);
                Section {
                    heading: lines[first_line].text,
                    title,
                    first_line,
                    end_line,
                    start: lines[first_line].offset,
                    end,
                }
            })
            .collect();

        Self {
            content,
            lines,
            sections,
            frontmatter_end,
        }
    }

    fn body_line(
        text: &'a str,
        index: usize,
        current: Option<usize>,
        headings: &mut Vec<(usize, &'a str)>,
    ) -> (LineKind, Region, ScanState) {
        if let Some(title) = heading_text(text) {
            let section = headings.len();
            headings.push((index, title));
            return (
                LineKind::Heading,
                Region::Section(section),
                ScanState::InSection(section),
            );
        }

        let kind = if is_title(text) {
            LineKind::Title
        } else if is_item(text) {
            LineKind::Item
        } else {
            LineKind::Text
        };
        match current {
            Some(section) => (kind, Region::Section(section), ScanState::InSection(section)),
            None => (kind, Region::Preamble, ScanState::BetweenSections),
        }
    }

    #[must_use]
    pub fn content(&self) -> &'a str {
        self.content
    }

    #[must_use]
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    #[must_use]
    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    #[must_use]
    pub fn has_frontmatter(&self) -> bool {
        self.frontmatter_end.is_some()
    }

    /// Index of the closing frontmatter delimiter, if any.
    #[must_use]
    pub fn frontmatter_end(&self) -> Option<usize> {
        self.frontmatter_end
    }

    /// First section (in document order) whose title satisfies `pred`.
    pub fn find_section(&self, mut pred: impl FnMut(&str) -> bool) -> Option<&Section<'a>> {
        self.sections.iter().find(|s| pred(s.title))
    }

    /// Section text from its heading to the next heading, trimmed.
    #[must_use]
    pub fn section_text(&self, section: &Section<'_>) -> &'a str {
        self.content[section.start..section.end].trim()
    }
}

/// Text of a `## ` heading line, or `None` if the line is not one.
/// `###` and deeper headings are not section boundaries.
#[must_use]
pub fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    rest.starts_with([' ', '\t']).then(|| rest.trim())
}

/// Whether a line is a `# ` title.
#[must_use]
pub fn is_title(line: &str) -> bool {
    line.strip_prefix('#')
        .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

/// Whether a line is a checklist item, ignoring leading whitespace.
#[must_use]
pub fn is_item(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("- [ ]") || line.starts_with("- [x]")
}

//! Detail-level views and focus filtering.

use lore_core::DetailLevel;

use crate::outline::{LineKind, Outline, Region};

/// Headings whose sections are left out of the standard view.
const NOISY_HEADINGS: &[&str] = &["anti-pattern", "smells to flag", "vulnerabilities"];

fn is_noisy(title: &str) -> bool {
    let title = title.to_lowercase();
    NOISY_HEADINGS.iter().any(|phrase| title.contains(phrase))
}

/// Render a checklist at the given detail level.
#[must_use]
pub fn reshape(content: &str, level: DetailLevel) -> String {
    match level {
        DetailLevel::Brief => reshape_to_items_only(content),
        DetailLevel::Standard => reshape_to_standard(content),
        DetailLevel::Detailed => content.to_string(),
    }
}

/// Title lines plus checklist items, each run of items preceded by a blank
/// line and its `## ` heading. Everything else is dropped, including items
/// in the sections the standard view suppresses.
#[must_use]
pub fn reshape_to_items_only(content: &str) -> String {
    let outline = Outline::parse(content);
    let mut out: Vec<&str> = Vec::new();
    let mut pending_heading = None;
    let mut suppressed = false;

    for line in outline.lines() {
        if let (LineKind::Heading, Region::Section(index)) = (line.kind, line.region) {
            suppressed = is_noisy(outline.sections()[index].title);
        }
        match line.kind {
            LineKind::Title => out.push(line.text),
            LineKind::Heading => pending_heading = (!suppressed).then_some(line.text),
            LineKind::Item if suppressed => {}
            LineKind::Item => {
                if let Some(heading) = pending_heading.take() {
                    out.push("");
                    out.push(heading);
                }
                out.push(line.text);
            }
            LineKind::Delimiter | LineKind::Text => {}
        }
    }

    out.join("\n")
}

/// Everything except sections under anti-pattern style headings.
#[must_use]
pub fn reshape_to_standard(content: &str) -> String {
    let outline = Outline::parse(content);
    let mut out: Vec<&str> = Vec::with_capacity(outline.lines().len());
    let mut suppressed = false;

    for line in outline.lines() {
        if let (LineKind::Heading, Region::Section(index)) = (line.kind, line.region) {
            suppressed = is_noisy(outline.sections()[index].title);
        }
        if !suppressed {
            out.push(line.text);
        }
    }

    out.join("\n")
}

fn focus_terms(focus: &str) -> Vec<String> {
    focus
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Keep only sections whose heading mentions one of the comma separated
/// `focus` terms, plus the title and frontmatter.
///
/// An empty focus returns the content unchanged. When no heading matches,
/// the whole document is returned behind a short note so the caller still
/// gets something usable.
#[must_use]
pub fn filter_by_focus(content: &str, focus: &str) -> String {
    let terms = focus_terms(focus);
    if terms.is_empty() {
        return content.to_string();
    }

    let outline = Outline::parse(content);
    let mut out: Vec<&str> = Vec::new();
    let mut include = false;
    let mut matched = 0usize;

    for line in outline.lines() {
        match (line.region, line.kind) {
            (Region::Frontmatter, _) | (_, LineKind::Title) => out.push(line.text),
            (Region::Section(index), LineKind::Heading) => {
                let title = outline.sections()[index].title.to_lowercase();
                include = terms.iter().any(|term| title.contains(term.as_str()));
                if include {
                    matched += 1;
                    if out.last().is_some_and(|last| !last.trim().is_empty()) {
                        out.push("");
                    }
                    out.push(line.text);
                }
            }
            (Region::Section(_), _) if include => out.push(line.text),
            _ => {}
        }
    }

    if matched == 0 {
        return format!(
            "No sections matching focus '{focus}' found. Returning full checklist.\n\n{content}"
        );
    }
    out.join("\n")
}

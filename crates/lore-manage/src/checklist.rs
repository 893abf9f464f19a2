//! Checklist edits.
//!
//! Edits work on whole lines. Sections are located with the same `## `
//! scanner the read side uses, so "section" means the same thing for a
//! read and a write.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use tracing::info;

use lore_core::error::LoreError;
use lore_extract::{heading_matcher, Outline};

use crate::manager::ContentManager;

/// One of the three supported edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistAction {
    AddItems,
    RemoveItems,
    ReplaceSection,
}

impl ChecklistAction {
    /// # Errors
    ///
    /// Returns [`LoreError::UnknownAction`] for anything but the three
    /// action names.
    pub fn parse(raw: &str) -> Result<Self, LoreError> {
        match raw {
            "add_items" => Ok(ChecklistAction::AddItems),
            "remove_items" => Ok(ChecklistAction::RemoveItems),
            "replace_section" => Ok(ChecklistAction::ReplaceSection),
            other => Err(LoreError::UnknownAction(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChecklistAction::AddItems => "add_items",
            ChecklistAction::RemoveItems => "remove_items",
            ChecklistAction::ReplaceSection => "replace_section",
        }
    }
}

impl fmt::Display for ChecklistAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`ContentManager::edit_checklist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEdit {
    pub task_type: String,
    pub action: ChecklistAction,
    pub section: String,
    /// Distinct lines present after the edit but not before.
    pub lines_added: usize,
    /// Distinct lines present before the edit but not after.
    pub lines_removed: usize,
}

impl ChecklistEdit {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Updated '{}' checklist: {} in '{}'. +{}/-{} lines.",
            self.task_type, self.action, self.section, self.lines_added, self.lines_removed
        )
    }
}

impl ContentManager {
    /// Apply `action` to a checklist, bump its version and save it.
    ///
    /// # Errors
    ///
    /// - [`LoreError::ChecklistNotFound`] if the checklist does not exist
    ///   (checked before the action name)
    /// - [`LoreError::UnknownAction`] for an unrecognized action
    /// - [`LoreError::SectionNotFound`] if `replace_section` finds no heading
    /// - [`LoreError::Io`] if the file cannot be read or written
    pub fn edit_checklist(
        &self,
        task_type: &str,
        action: &str,
        section: &str,
        content: &str,
    ) -> Result<ChecklistEdit, LoreError> {
        let path = self
            .repository()
            .checklist_path(task_type)
            .filter(|path| self.vault().exists(path))
            .ok_or_else(|| LoreError::ChecklistNotFound(task_type.to_string()))?;
        let action = ChecklistAction::parse(action)?;
        let original = self.vault().read(&path)?;

        let edited = match action {
            ChecklistAction::AddItems => add_items(&original, section, content),
            ChecklistAction::RemoveItems => remove_items(&original, content),
            ChecklistAction::ReplaceSection => replace_section(&original, section, content)
                .ok_or_else(|| LoreError::SectionNotFound {
                    task_type: task_type.to_string(),
                    section: section.to_string(),
                })?,
        };
        let edited = bump_version(&edited, &self.today());
        self.vault().write(&path, &edited)?;

        let (lines_added, lines_removed) = line_diff(&original, &edited);
        info!(task_type, %action, section, lines_added, lines_removed, "checklist edited");
        Ok(ChecklistEdit {
            task_type: task_type.to_string(),
            action,
            section: section.to_string(),
            lines_added,
            lines_removed,
        })
    }
}

fn item_lines(content: &str) -> impl Iterator<Item = &str> {
    content.trim().split('\n')
}

/// Insert `items` at the end of the first section whose heading contains
/// `section`, ahead of the blank lines that separate it from the next
/// heading. Without a match a new `## {section}` is appended.
#[must_use]
pub fn add_items(content: &str, section: &str, items: &str) -> String {
    let heading = format!("## {section}");
    let outline = Outline::parse(content);
    let mut lines: Vec<&str> = outline.lines().iter().map(|line| line.text).collect();

    match outline.find_section(heading_matcher(section)) {
        Some(found) => {
            let mut at = found.end_line;
            while at > found.first_line + 1 && lines[at - 1].trim().is_empty() {
                at -= 1;
            }
            let tail = lines.split_off(at);
            lines.extend(item_lines(items));
            lines.extend(tail);
        }
        None => {
            let trailing_newline = content.ends_with('\n');
            while lines.last().is_some_and(|line| line.trim().is_empty()) {
                lines.pop();
            }
            if !lines.is_empty() {
                lines.push("");
            }
            lines.push(&heading);
            lines.extend(item_lines(items));
            if trailing_newline {
                lines.push("");
            }
        }
    }
    lines.join("\n")
}

/// Drop every line containing any non-empty trimmed line of `patterns`.
#[must_use]
pub fn remove_items(content: &str, patterns: &str) -> String {
    let patterns: Vec<&str> = patterns
        .lines()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    content
        .split('\n')
        .filter(|line| !patterns.iter().any(|p| line.contains(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the body of the first section whose heading contains
/// `section`, keeping the heading. `None` if no heading matches.
#[must_use]
pub fn replace_section(content: &str, section: &str, body: &str) -> Option<String> {
    let outline = Outline::parse(content);
    let found = outline.find_section(heading_matcher(section))?;
    let lines: Vec<&str> = outline.lines().iter().map(|line| line.text).collect();

    let mut out: Vec<&str> = lines[..found.first_line].to_vec();
    out.push(found.heading);
    out.extend(item_lines(body));
    if found.end_line < lines.len() {
        out.push("");
        out.extend_from_slice(&lines[found.end_line..]);
    } else if content.ends_with('\n') {
        out.push("");
    }
    Some(out.join("\n"))
}

/// Increment `version:` and restamp `updated:` inside the frontmatter.
/// A version that is not an integer is left as is; a document without
/// frontmatter is returned unchanged.
#[must_use]
pub fn bump_version(content: &str, today: &str) -> String {
    let outline = Outline::parse(content);
    let Some(end) = outline.frontmatter_end() else {
        return content.to_string();
    };
    outline
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let text = line.text;
            if index == 0 || index >= end {
                return Cow::Borrowed(text);
            }
            if let Some(rest) = text.strip_prefix("version:") {
                return match rest.trim().parse::<u64>().ok().and_then(|v| v.checked_add(1)) {
                    Some(version) => Cow::Owned(format!("version: {version}")),
                    None => Cow::Borrowed(text),
                };
            }
            if text.starts_with("updated:") {
                return Cow::Owned(format!("updated: {today}"));
            }
            Cow::Borrowed(text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Distinct-line counts `(added, removed)` between two documents.
#[must_use]
pub fn line_diff(before: &str, after: &str) -> (usize, usize) {
    let old: HashSet<&str> = before.split('\n').collect();
    let new: HashSet<&str> = after.split('\n').collect();
    (new.difference(&old).count(), old.difference(&new).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lore_vault::Vault;
    use std::path::Path;

    const CODE_REVIEW: &str = "---\nversion: 1\nupdated: 2024-01-01\ndescription: Review pull requests\n---\n# Code Review Checklist\n\n## Security\n- [ ] Validate all inputs [01]\n\n## Testing\n- [ ] Cover edge cases [02]\n";

    fn fixture() -> (tempfile::TempDir, ContentManager) {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        vault
            .write(Path::new("knowledge/checklists/code_review.md"), CODE_REVIEW)
            .unwrap();
        let manager =
            ContentManager::new(vault).with_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        (dir, manager)
    }

    fn read(manager: &ContentManager) -> String {
        manager
            .vault()
            .read(Path::new("knowledge/checklists/code_review.md"))
            .unwrap()
    }

    #[test]
    fn add_items_appends_to_section_and_bumps_version() {
        let (_dir, manager) = fixture();
        let edit = manager
            .edit_checklist("code_review", "add_items", "Security", "- [ ] Check authz")
            .unwrap();
        let text = read(&manager);

        assert_eq!(
            text,
            "---\nversion: 2\nupdated: 2025-06-01\ndescription: Review pull requests\n---\n# Code Review Checklist\n\n## Security\n- [ ] Validate all inputs [01]\n- [ ] Check authz\n\n## Testing\n- [ ] Cover edge cases [02]\n"
        );
        assert_eq!(edit.lines_added, 3);
        assert_eq!(edit.lines_removed, 2);
        assert_eq!(
            edit.message(),
            "Updated 'code_review' checklist: add_items in 'Security'. +3/-2 lines."
        );
    }

    #[test]
    fn add_items_matches_heading_case_insensitively() {
        let added = add_items(CODE_REVIEW, "testing", "- [ ] Fuzz parsers\n- [ ] Snapshot output\n");
        assert!(added.ends_with(
            "## Testing\n- [ ] Cover edge cases [02]\n- [ ] Fuzz parsers\n- [ ] Snapshot output\n"
        ));
    }

    #[test]
    fn add_items_creates_missing_section() {
        let added = add_items(CODE_REVIEW, "Performance", "- [ ] Profile hot paths");
        assert!(added.ends_with(
            "- [ ] Cover edge cases [02]\n\n## Performance\n- [ ] Profile hot paths\n"
        ));
    }

    #[test]
    fn add_items_first_match_only() {
        let doc = "# T\n\n## Unit Testing\n- [ ] a\n\n## Load Testing\n- [ ] b";
        let added = add_items(doc, "testing", "- [ ] c");
        assert_eq!(
            added,
            "# T\n\n## Unit Testing\n- [ ] a\n- [ ] c\n\n## Load Testing\n- [ ] b"
        );
    }

    #[test]
    fn remove_items_drops_substring_matches() {
        let removed = remove_items(CODE_REVIEW, "Validate all\n\n  edge cases  \n");
        assert!(!removed.contains("Validate all inputs"));
        assert!(!removed.contains("edge cases"));
        assert!(removed.contains("## Security"));
        assert_eq!(remove_items(CODE_REVIEW, "  \n"), CODE_REVIEW);
    }

    #[test]
    fn replace_section_keeps_heading_and_separator() {
        let replaced = replace_section(CODE_REVIEW, "security", "- [ ] New A\n- [ ] New B").unwrap();
        assert!(replaced.contains("## Security\n- [ ] New A\n- [ ] New B\n\n## Testing\n"));
        assert!(!replaced.contains("Validate all inputs"));

        let last = replace_section(CODE_REVIEW, "Testing", "- [ ] Only").unwrap();
        assert!(last.ends_with("## Testing\n- [ ] Only\n"));
    }

    #[test]
    fn replace_missing_section_is_an_error_and_leaves_file() {
        let (_dir, manager) = fixture();
        let err = manager
            .edit_checklist("code_review", "replace_section", "Deployment", "- [ ] x")
            .unwrap_err();
        assert!(matches!(err, LoreError::SectionNotFound { .. }));
        assert_eq!(read(&manager), CODE_REVIEW);
    }

    #[test]
    fn missing_checklist_is_checked_before_action() {
        let (_dir, manager) = fixture();
        let err = manager
            .edit_checklist("nope", "merge", "Security", "")
            .unwrap_err();
        assert_eq!(err.to_string(), "Checklist 'nope' not found.");

        let err = manager
            .edit_checklist("code_review", "merge", "Security", "")
            .unwrap_err();
        assert!(matches!(err, LoreError::UnknownAction(ref a) if a == "merge"));
        assert_eq!(read(&manager), CODE_REVIEW);
    }

    #[test]
    fn bump_version_only_touches_frontmatter() {
        let doc = "---\nversion: 7\nupdated: old\n---\n# T\n\nversion: 1\nupdated: body\n";
        assert_eq!(
            bump_version(doc, "2025-01-02"),
            "---\nversion: 8\nupdated: 2025-01-02\n---\n# T\n\nversion: 1\nupdated: body\n"
        );
        let odd = "---\nversion: two\n---\n";
        assert_eq!(bump_version(odd, "2025-01-02"), odd);
        assert_eq!(bump_version("# No frontmatter\n", "x"), "# No frontmatter\n");
    }

    #[test]
    fn bump_version_at_u64_max_is_left_alone() {
        let doc = "---\nversion: 18446744073709551615\nupdated: old\n---\n# T\n";
        assert_eq!(
            bump_version(doc, "2025-01-02"),
            "---\nversion: 18446744073709551615\nupdated: 2025-01-02\n---\n# T\n"
        );
    }

    #[test]
    fn successive_edits_keep_incrementing() {
        let (_dir, manager) = fixture();
        manager
            .edit_checklist("code_review", "remove_items", "Security", "Validate")
            .unwrap();
        manager
            .edit_checklist("code_review", "add_items", "Security", "- [ ] Re-added")
            .unwrap();
        let text = read(&manager);
        assert!(text.starts_with("---\nversion: 3\nupdated: 2025-06-01\n"));
    }

    #[test]
    fn parses_actions() {
        assert_eq!(
            ChecklistAction::parse("replace_section").unwrap(),
            ChecklistAction::ReplaceSection
        );
        assert!(ChecklistAction::parse("Add_Items").is_err());
    }
}

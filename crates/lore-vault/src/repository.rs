//! Read side: identifier resolution and shaped views.
//!
//! Every read here degrades gracefully. An unknown task, source or
//! section produces a human readable "not found" message instead of an
//! error, because the caller is usually an agent mid-conversation.

use std::path::PathBuf;

use tracing::{debug, warn};

use lore_core::error::LoreError;
use lore_core::frontmatter::parse_frontmatter;
use lore_core::{DetailLevel, SourceId, SourceKind};
use lore_extract::{extract_named_section, filter_by_focus, reshape};

use crate::vault::{to_slash, Vault};

/// A source note found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub id: String,
    /// Title derived from the filename slug.
    pub title: String,
    /// Root-relative path.
    pub file: String,
}

/// A checklist found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistListing {
    pub task_type: String,
    pub description: String,
}

/// Resolves identifiers to documents and renders views of them.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    vault: Vault,
}

impl ContentRepository {
    #[must_use]
    pub fn new(vault: Vault) -> Self {
        Self { vault }
    }

    #[must_use]
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Root-relative path of a source note: the first file, in sorted
    /// order, named `{NN}_*.md` in the book or article directory.
    #[must_use]
    pub fn resolve_source_path(&self, id: &SourceId) -> Option<PathBuf> {
        let dir = self.vault.layout().source_dir(id.kind);
        let prefix = format!("{}_", id.digits());
        let names = match self.vault.list(dir) {
            Ok(names) => names,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot list source directory");
                return None;
            }
        };
        let resolved = names
            .into_iter()
            .find(|name| name.starts_with(&prefix) && name.ends_with(".md"))
            .map(|name| dir.join(name));
        debug!(id = %id, path = ?resolved, "resolved source");
        resolved
    }

    /// Root-relative path of a checklist, or `None` for slugs that could
    /// escape the checklist directory.
    #[must_use]
    pub fn checklist_path(&self, task_type: &str) -> Option<PathBuf> {
        let safe = !task_type.is_empty()
            && !task_type.starts_with('.')
            && !task_type.contains(['/', '\\'])
            && !task_type.contains("..");
        safe.then(|| {
            self.vault
                .layout()
                .checklists_dir
                .join(format!("{task_type}.md"))
        })
    }

    /// Raw checklist text, or `None` if the checklist does not exist.
    #[must_use]
    pub fn load_checklist(&self, task_type: &str) -> Option<String> {
        let path = self.checklist_path(task_type)?;
        if !self.vault.exists(&path) {
            return None;
        }
        self.vault
            .read(&path)
            .inspect_err(|e| warn!(task_type, error = %e, "cannot read checklist"))
            .ok()
    }

    /// One named section of a source note (`full` for the whole note).
    #[must_use]
    pub fn read_source_section(&self, id: &str, section: &str) -> String {
        let Some(path) = SourceId::parse(id).and_then(|sid| self.resolve_source_path(&sid)) else {
            return format!("Source '{id}' not found.");
        };
        let content = match self.vault.read(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(id, error = %e, "cannot read source note");
                return format!("Source '{id}' not found.");
            }
        };
        match extract_named_section(&content, section) {
            Some(text) => text.to_string(),
            None => format!("Section '{section}' not found in source '{id}'."),
        }
    }

    /// A checklist at the requested detail level.
    #[must_use]
    pub fn read_checklist(&self, task_type: &str, level: DetailLevel) -> String {
        match self.load_checklist(task_type) {
            Some(content) => reshape(&content, level),
            None => checklist_not_found(task_type),
        }
    }

    /// Narrow content to sections whose headings mention a focus term.
    #[must_use]
    pub fn filter_by_focus(&self, content: &str, focus: &str) -> String {
        filter_by_focus(content, focus)
    }

    /// The `get_checklist` operation: detail level, then focus.
    #[must_use]
    pub fn checklist_view(&self, task_type: &str, level: DetailLevel, focus: &str) -> String {
        match self.load_checklist(task_type) {
            Some(content) => filter_by_focus(&reshape(&content, level), focus),
            None => checklist_not_found(task_type),
        }
    }

    /// Source notes on disk for one kind, sorted by filename.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the directory exists but cannot be read.
    pub fn list_sources(&self, kind: SourceKind) -> Result<Vec<SourceListing>, LoreError> {
        let dir = self.vault.layout().source_dir(kind);
        let listings = self
            .vault
            .list(dir)?
            .into_iter()
            .filter_map(|name| {
                let stem = name.strip_suffix(".md")?;
                let bytes = stem.as_bytes();
                let well_formed = bytes.len() > 3
                    && bytes[0].is_ascii_digit()
                    && bytes[1].is_ascii_digit()
                    && bytes[2] == b'_';
                if !well_formed {
                    return None;
                }
                let id = match kind {
                    SourceKind::Book => stem[..2].to_string(),
                    SourceKind::Article => format!("a{}", &stem[..2]),
                };
                Some(SourceListing {
                    id,
                    title: deslug(&stem[3..]),
                    file: to_slash(&dir.join(&name)),
                })
            })
            .collect();
        Ok(listings)
    }

    /// Checklists on disk with their frontmatter `description`.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the directory or a checklist cannot be read.
    pub fn list_checklists(&self) -> Result<Vec<ChecklistListing>, LoreError> {
        let dir = &self.vault.layout().checklists_dir;
        let mut listings = Vec::new();
        for name in self.vault.list(dir)? {
            let Some(task_type) = name.strip_suffix(".md") else {
                continue;
            };
            let content = self.vault.read(&dir.join(&name))?;
            let (meta, _) = parse_frontmatter(&content);
            listings.push(ChecklistListing {
                task_type: task_type.to_string(),
                description: meta.scalar("description").unwrap_or_default().to_string(),
            });
        }
        Ok(listings)
    }
}

fn checklist_not_found(task_type: &str) -> String {
    format!("Checklist '{task_type}' not found.")
}

/// `api_design_patterns` → `Api Design Patterns`.
fn deslug(slug: &str) -> String {
    let mut title = String::with_capacity(slug.len());
    let mut in_word = false;
    for c in slug.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

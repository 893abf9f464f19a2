//! Adding books and articles.

use tracing::info;

use lore_core::error::LoreError;
use lore_core::{SourceEntry, SourceId, SourceKind};
use lore_registry::Registry;
use lore_vault::vault::to_slash;

use crate::manager::ContentManager;
use crate::slug::slugify;

/// Input to [`ContentManager::add_source`].
#[derive(Debug, Clone, Default)]
pub struct NewSource {
    pub title: String,
    /// `article` or `blog` file under articles; anything else is a book.
    pub source_type: String,
    /// Markdown written verbatim as the source note.
    pub content: String,
    pub category: String,
    /// Tasks whose routing should cite the new source. Unknown slugs are
    /// skipped.
    pub task_types: Vec<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
}

/// Outcome of [`ContentManager::add_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedSource {
    pub title: String,
    pub id: SourceId,
    /// Root-relative path of the new note.
    pub file: String,
    pub tasks_updated: Vec<String>,
}

impl AddedSource {
    #[must_use]
    pub fn message(&self) -> String {
        let tasks = if self.tasks_updated.is_empty() {
            "none".to_string()
        } else {
            self.tasks_updated.join(", ")
        };
        format!(
            "Added '{}' as {}. File: {}. Updated routing for: {tasks}.",
            self.title, self.id, self.file
        )
    }
}

impl ContentManager {
    /// Write a new source note, register it in the catalog and cite it
    /// from the requested tasks.
    ///
    /// The three writes (note, catalog, routing) are independent: a
    /// failure part way leaves the earlier ones in place.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if a file cannot be written, or
    /// [`LoreError::Serialization`] if an index on disk is malformed.
    pub fn add_source(
        &self,
        registry: &mut Registry,
        source: NewSource,
    ) -> Result<AddedSource, LoreError> {
        let kind = SourceKind::from_source_type(&source.source_type);
        registry.reload();
        let id = registry.catalog()?.next_id(kind);

        let rel = self
            .vault()
            .layout()
            .source_dir(kind)
            .join(format!("{}_{}.md", id.digits(), slugify(&source.title)));
        self.vault().write(&rel, &source.content)?;
        let file = to_slash(&rel);
        let today = self.today();

        let entry = SourceEntry {
            title: source.title.clone(),
            category: source.category,
            file: file.clone(),
            author: source.author.filter(|a| !a.trim().is_empty()),
            year: source.year.filter(|&y| y != 0),
            date: Some(today.clone()),
            extra: Default::default(),
        };
        let catalog = registry.catalog_mut()?;
        catalog.insert(id, entry);
        catalog.set_updated(&today);
        registry.save_catalog()?;

        let routing = registry.routing_mut()?;
        let mut tasks_updated = Vec::new();
        for task_type in &source.task_types {
            if let Some(route) = routing.tasks.get_mut(task_type) {
                if route.append_source(&id) {
                    tasks_updated.push(task_type.clone());
                }
            }
        }
        routing.set_updated(&today);
        registry.save_routing()?;

        info!(
            id = %id,
            file = %file,
            kind = kind.as_str(),
            list = kind.routing_list(),
            tasks = tasks_updated.len(),
            "source added"
        );
        Ok(AddedSource {
            title: source.title,
            id,
            file,
            tasks_updated,
        })
    }
}

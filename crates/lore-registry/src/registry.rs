//! The routing table and source catalog, cached per session.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use lore_core::error::LoreError;
use lore_core::{RoutingTable, SourceCatalog, SourceEntry, SourceId, TaskRoute};
use lore_vault::Vault;

/// A cached index plus the moment it was read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub loaded_at: DateTime<Utc>,
}

impl<T> Loaded<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            loaded_at: Utc::now(),
        }
    }
}

/// A routed ID with no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingSource {
    pub task_type: String,
    /// Routing list the ID appears in (`primary_sources`, ...).
    pub list: &'static str,
    pub id: String,
}

/// Lazily loaded routing table and catalog.
///
/// Nothing is read until first access. [`Registry::reload`] drops both
/// copies so the next access sees the files as they are now.
#[derive(Debug, Clone)]
pub struct Registry {
    vault: Vault,
    routing: Option<Loaded<RoutingTable>>,
    catalog: Option<Loaded<SourceCatalog>>,
}

impl Registry {
    #[must_use]
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            routing: None,
            catalog: None,
        }
    }

    #[must_use]
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Forget both cached indexes.
    pub fn reload(&mut self) {
        debug!("registry reload");
        self.routing = None;
        self.catalog = None;
    }

    /// When the routing table was last read, if it is cached.
    #[must_use]
    pub fn routing_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.routing.as_ref().map(|l| l.loaded_at)
    }

    /// When the catalog was last read, if it is cached.
    #[must_use]
    pub fn catalog_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.catalog.as_ref().map(|l| l.loaded_at)
    }

    /// The routing table. A missing `routing.json` reads as an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] or [`LoreError::Serialization`] if the
    /// file exists but cannot be read or parsed.
    pub fn routing(&mut self) -> Result<&RoutingTable, LoreError> {
        Ok(&self.routing_entry()?.data)
    }

    /// The source catalog. A missing `book_index.json` reads as empty.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn catalog(&mut self) -> Result<&SourceCatalog, LoreError> {
        Ok(&self.catalog_entry()?.data)
    }

    /// Mutable routing table. Changes stay in memory until
    /// [`Registry::save_routing`].
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn routing_mut(&mut self) -> Result<&mut RoutingTable, LoreError> {
        Ok(&mut self.routing_entry()?.data)
    }

    /// Mutable catalog. Changes stay in memory until
    /// [`Registry::save_catalog`].
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn catalog_mut(&mut self) -> Result<&mut SourceCatalog, LoreError> {
        Ok(&mut self.catalog_entry()?.data)
    }

    /// Both indexes at once.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn indexes(&mut self) -> Result<(&RoutingTable, &SourceCatalog), LoreError> {
        let routing = match self.routing.take() {
            Some(loaded) => loaded,
            None => self.read_index(&self.vault.layout().routing_file)?,
        };
        let catalog = match self.catalog.take() {
            Some(loaded) => loaded,
            None => self.read_index(&self.vault.layout().catalog_file)?,
        };
        let routing = self.routing.insert(routing);
        let catalog = self.catalog.insert(catalog);
        Ok((&routing.data, &catalog.data))
    }

    /// Write the cached routing table back to disk. No-op if it was never
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the file cannot be written.
    pub fn save_routing(&self) -> Result<(), LoreError> {
        match &self.routing {
            Some(loaded) => self.write_index(&self.vault.layout().routing_file, &loaded.data),
            None => Ok(()),
        }
    }

    /// Write the cached catalog back to disk. No-op if it was never loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the file cannot be written.
    pub fn save_catalog(&self) -> Result<(), LoreError> {
        match &self.catalog {
            Some(loaded) => self.write_index(&self.vault.layout().catalog_file, &loaded.data),
            None => Ok(()),
        }
    }

    /// Task slugs in routing table order (sorted).
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn list_task_types(&mut self) -> Result<Vec<String>, LoreError> {
        Ok(self.routing()?.tasks.keys().cloned().collect())
    }

    /// Routing record for one task.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn task_info(&mut self, task_type: &str) -> Result<Option<&TaskRoute>, LoreError> {
        Ok(self.routing()?.tasks.get(task_type))
    }

    /// Catalog record for a book (`NN`) or article (`aNN`).
    ///
    /// # Errors
    ///
    /// Same as [`Registry::catalog`].
    pub fn source_info(&mut self, id: &str) -> Result<Option<&SourceEntry>, LoreError> {
        let Some(id) = SourceId::parse(id) else {
            return Ok(None);
        };
        Ok(self.catalog()?.get(&id))
    }

    /// Routed IDs that have no catalog entry, in task order.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn dangling_sources(&mut self) -> Result<Vec<DanglingSource>, LoreError> {
        let (routing, catalog) = self.indexes()?;
        let mut dangling = Vec::new();
        for (task_type, route) in &routing.tasks {
            for (list, id) in route.cited_sources() {
                if !catalog.contains_key(id) {
                    dangling.push(DanglingSource {
                        task_type: task_type.clone(),
                        list,
                        id: id.to_string(),
                    });
                }
            }
        }
        Ok(dangling)
    }

    fn routing_entry(&mut self) -> Result<&mut Loaded<RoutingTable>, LoreError> {
        let loaded = match self.routing.take() {
            Some(loaded) => loaded,
            None => self.read_index(&self.vault.layout().routing_file)?,
        };
        Ok(self.routing.insert(loaded))
    }

    fn catalog_entry(&mut self) -> Result<&mut Loaded<SourceCatalog>, LoreError> {
        let loaded = match self.catalog.take() {
            Some(loaded) => loaded,
            None => self.read_index(&self.vault.layout().catalog_file)?,
        };
        Ok(self.catalog.insert(loaded))
    }

    fn read_index<T: DeserializeOwned + Default>(
        &self,
        rel: &Path,
    ) -> Result<Loaded<T>, LoreError> {
        if !self.vault.exists(rel) {
            debug!(path = %rel.display(), "index missing, using empty");
            return Ok(Loaded::new(T::default()));
        }
        let text = self.vault.read(rel)?;
        let data = serde_json::from_str(&text)
            .map_err(|e| LoreError::Serialization(format!("{}: {e}", rel.display())))?;
        debug!(path = %rel.display(), "index loaded");
        Ok(Loaded::new(data))
    }

    fn write_index<T: Serialize>(&self, rel: &Path, data: &T) -> Result<(), LoreError> {
        let mut text = serde_json::to_string_pretty(data)?;
        text.push('\n');
        self.vault.write(rel, &text)?;
        info!(path = %rel.display(), "index saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTING: &str = r#"{
  "updated": "2024-01-01",
  "tasks": {
    "code_review": {"description": "Review code", "primary_sources": ["01"], "secondary_sources": ["02"], "anthropic_articles": ["a01"]},
    "architecture": {"description": "Design systems", "primary_sources": ["01", "07"]}
  }
}"#;

    const CATALOG: &str = r#"{
  "books": {
    "01": {"title": "DDIA", "category": "Data", "file": "book_research/01_ddia.md", "author": "Kleppmann", "year": 2017},
    "02": {"title": "Clean Code", "category": "Code", "file": "book_research/02_clean_code.md"}
  },
  "articles": {
    "a01": {"title": "Building Effective Agents", "category": "Agents", "file": "book_research/anthropic_articles/01_agents.md", "date": "2024-12-19"}
  }
}"#;

    fn fixture() -> (tempfile::TempDir, Registry) {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        vault.write(Path::new("knowledge/routing.json"), ROUTING).unwrap();
        vault.write(Path::new("knowledge/book_index.json"), CATALOG).unwrap();
        (dir, Registry::new(vault))
    }

    #[test]
    fn missing_files_load_as_empty_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::new(Vault::open(dir.path()).unwrap());
        assert!(registry.routing().unwrap().tasks.is_empty());
        let catalog = registry.catalog().unwrap();
        assert!(catalog.books.is_empty());
        assert!(catalog.articles.is_empty());
    }

    #[test]
    fn loads_lazily_and_records_load_time() {
        let (_dir, mut registry) = fixture();
        assert!(registry.routing_loaded_at().is_none());
        assert!(registry.catalog_loaded_at().is_none());

        assert_eq!(registry.list_task_types().unwrap(), vec!["architecture", "code_review"]);
        assert!(registry.routing_loaded_at().is_some());
        assert!(registry.catalog_loaded_at().is_none());
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let (_dir, mut registry) = fixture();
        assert!(registry.task_info("testing").unwrap().is_none());

        registry
            .vault()
            .write(
                Path::new("knowledge/routing.json"),
                r#"{"tasks": {"testing": {"description": "Write tests"}}}"#,
            )
            .unwrap();
        assert!(registry.task_info("testing").unwrap().is_none(), "cached copy is stale");

        registry.reload();
        assert!(registry.routing_loaded_at().is_none());
        let info = registry.task_info("testing").unwrap().unwrap();
        assert_eq!(info.description, "Write tests");
    }

    #[test]
    fn source_info_dispatches_on_id_shape() {
        let (_dir, mut registry) = fixture();
        assert_eq!(registry.source_info("01").unwrap().unwrap().title, "DDIA");
        assert_eq!(
            registry.source_info("a01").unwrap().unwrap().title,
            "Building Effective Agents"
        );
        assert!(registry.source_info("a02").unwrap().is_none());
        assert!(registry.source_info("bogus").unwrap().is_none());
    }

    #[test]
    fn save_writes_pretty_json_and_keeps_unknown_keys() {
        let (_dir, mut registry) = fixture();
        registry
            .routing_mut()
            .unwrap()
            .tasks
            .get_mut("code_review")
            .unwrap()
            .secondary_sources
            .push("09".to_string());
        registry.save_routing().unwrap();

        let text = registry.vault().read(Path::new("knowledge/routing.json")).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"tasks\""));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["updated"], "2024-01-01");
        assert_eq!(
            value["tasks"]["code_review"]["secondary_sources"],
            serde_json::json!(["02", "09"])
        );
    }

    #[test]
    fn save_without_load_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new(Vault::open(dir.path()).unwrap());
        registry.save_routing().unwrap();
        registry.save_catalog().unwrap();
        assert!(!registry.vault().exists(Path::new("knowledge/routing.json")));
    }

    #[test]
    fn malformed_index_is_a_serialization_error() {
        let (_dir, mut registry) = fixture();
        registry
            .vault()
            .write(Path::new("knowledge/book_index.json"), "{ not json")
            .unwrap();
        let err = registry.catalog().unwrap_err();
        assert!(matches!(err, LoreError::Serialization(msg) if msg.contains("book_index.json")));
    }

    #[test]
    fn finds_routed_ids_missing_from_catalog() {
        let (_dir, mut registry) = fixture();
        let dangling = registry.dangling_sources().unwrap();
        assert_eq!(
            dangling,
            vec![DanglingSource {
                task_type: "architecture".to_string(),
                list: "primary_sources",
                id: "07".to_string(),
            }]
        );
    }
}

//! Source catalog (`book_index.json`).
//!
//! Two partitions, `books` keyed by `NN` and `articles` keyed by `aNN`.
//! Keys the catalog does not model (such as the top-level `updated`
//! stamp) are kept in `extra` so a rewrite never drops them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::{SourceId, SourceKind};

/// Metadata for one book or article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// Path of the source note, relative to the knowledge root.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// ISO date the entry was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The full source catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCatalog {
    #[serde(default)]
    pub books: BTreeMap<String, SourceEntry>,
    #[serde(default)]
    pub articles: BTreeMap<String, SourceEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SourceCatalog {
    #[must_use]
    pub fn partition(&self, kind: SourceKind) -> &BTreeMap<String, SourceEntry> {
        match kind {
            SourceKind::Book => &self.books,
            SourceKind::Article => &self.articles,
        }
    }

    pub fn partition_mut(&mut self, kind: SourceKind) -> &mut BTreeMap<String, SourceEntry> {
        match kind {
            SourceKind::Book => &mut self.books,
            SourceKind::Article => &mut self.articles,
        }
    }

    #[must_use]
    pub fn get(&self, id: &SourceId) -> Option<&SourceEntry> {
        self.partition(id.kind).get(&id.to_string())
    }

    /// Whether a raw catalog key exists in either partition.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.books.contains_key(key) || self.articles.contains_key(key)
    }

    /// Next unused identifier for `kind`: the highest existing number plus one.
    /// Keys that are not well-formed identifiers of that kind are ignored.
    #[must_use]
    pub fn next_id(&self, kind: SourceKind) -> SourceId {
        let max = self
            .partition(kind)
            .keys()
            .filter_map(|key| SourceId::parse(key))
            .filter(|id| id.kind == kind)
            .map(|id| id.number)
            .max()
            .unwrap_or(0);
        SourceId::new(kind, max + 1)
    }

    pub fn insert(&mut self, id: SourceId, entry: SourceEntry) {
        self.partition_mut(id.kind).insert(id.to_string(), entry);
    }

    /// All entries in both partitions as `(kind, key, entry)`, books first.
    pub fn entries(&self) -> impl Iterator<Item = (SourceKind, &str, &SourceEntry)> {
        self.books
            .iter()
            .map(|(k, e)| (SourceKind::Book, k.as_str(), e))
            .chain(
                self.articles
                    .iter()
                    .map(|(k, e)| (SourceKind::Article, k.as_str(), e)),
            )
    }

    /// Stamp the top-level `updated` field.
    pub fn set_updated(&mut self, date: &str) {
        self.extra.insert(
            "updated".to_string(),
            serde_json::Value::String(date.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> SourceEntry {
        SourceEntry {
            title: title.to_string(),
            file: format!("book_research/{title}.md"),
            ..Default::default()
        }
    }

    #[test]
    fn deserializes_partial_catalog_and_keeps_unknown_keys() {
        let json = r#"{
            "books": {"01": {"title": "DDIA", "category": "Data", "file": "book_research/01_ddia.md", "author": "Kleppmann", "year": 2017, "isbn": "x"}},
            "updated": "2024-01-01"
        }"#;
        let catalog: SourceCatalog = serde_json::from_str(json).unwrap();
        assert!(catalog.articles.is_empty());
        let book = &catalog.books["01"];
        assert_eq!(book.author.as_deref(), Some("Kleppmann"));
        assert_eq!(book.year, Some(2017));
        assert_eq!(book.extra["isbn"], "x");
        assert_eq!(catalog.extra["updated"], "2024-01-01");

        let back = serde_json::to_value(&catalog).unwrap();
        assert_eq!(back["books"]["01"]["isbn"], "x");
        assert_eq!(back["updated"], "2024-01-01");
        assert!(back["articles"].as_object().unwrap().is_empty());
    }

    #[test]
    fn next_id_is_per_partition() {
        let mut catalog = SourceCatalog::default();
        assert_eq!(catalog.next_id(SourceKind::Book).to_string(), "01");
        assert_eq!(catalog.next_id(SourceKind::Article).to_string(), "a01");

        catalog.insert(SourceId::new(SourceKind::Book, 1), entry("one"));
        catalog.insert(SourceId::new(SourceKind::Book, 9), entry("nine"));
        catalog.insert(SourceId::new(SourceKind::Article, 4), entry("four"));
        catalog
            .books
            .insert("legacy".to_string(), entry("not an id"));

        assert_eq!(catalog.next_id(SourceKind::Book).to_string(), "10");
        assert_eq!(catalog.next_id(SourceKind::Article).to_string(), "a05");
    }

    #[test]
    fn lookup_by_id_dispatches_on_kind() {
        let mut catalog = SourceCatalog::default();
        catalog.insert(SourceId::new(SourceKind::Book, 2), entry("book"));
        catalog.insert(SourceId::new(SourceKind::Article, 2), entry("article"));

        let book = SourceId::parse("02").unwrap();
        let article = SourceId::parse("a02").unwrap();
        assert_eq!(catalog.get(&book).unwrap().title, "book");
        assert_eq!(catalog.get(&article).unwrap().title, "article");
        assert!(catalog.contains_key("a02"));
        assert!(!catalog.contains_key("a03"));
        assert_eq!(catalog.entries().count(), 2);
    }
}

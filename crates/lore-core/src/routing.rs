//! Task routing table (`routing.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::{SourceId, SourceKind};

/// Sources relevant to one task type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRoute {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub primary_sources: Vec<String>,
    #[serde(default)]
    pub secondary_sources: Vec<String>,
    #[serde(default)]
    pub anthropic_articles: Vec<String>,
    /// Checklist path relative to the routing file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_file: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskRoute {
    /// Every cited source ID with the list it came from.
    pub fn cited_sources(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let primary = self
            .primary_sources
            .iter()
            .map(|id| ("primary_sources", id.as_str()));
        let secondary = self
            .secondary_sources
            .iter()
            .map(|id| ("secondary_sources", id.as_str()));
        let articles = self
            .anthropic_articles
            .iter()
            .map(|id| ("anthropic_articles", id.as_str()));
        primary.chain(secondary).chain(articles)
    }

    /// Append `id` to the list for its kind. Returns `false` if it was
    /// already present.
    pub fn append_source(&mut self, id: &SourceId) -> bool {
        let list = match id.kind {
            SourceKind::Book => &mut self.secondary_sources,
            SourceKind::Article => &mut self.anthropic_articles,
        };
        let key = id.to_string();
        if list.contains(&key) {
            return false;
        }
        list.push(key);
        true
    }
}

/// The full routing table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingTable {
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskRoute>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RoutingTable {
    /// Stamp the top-level `updated` field.
    pub fn set_updated(&mut self, date: &str) {
        self.extra.insert(
            "updated".to_string(),
            serde_json::Value::String(date.to_string()),
        );
    }
}

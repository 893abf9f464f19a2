//! Knowledge root configuration (`lore.toml`).
//!
//! Every key is optional; a missing file means the default layout:
//! ```toml
//! [layout]
//! books_dir = "book_research"
//! articles_dir = "book_research/anthropic_articles"
//! checklists_dir = "knowledge/checklists"
//! routing_file = "knowledge/routing.json"
//! catalog_file = "knowledge/book_index.json"
//!
//! [server]
//! name = "lore"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoreError;
use crate::source::SourceKind;

/// Default config filename, looked up in the knowledge root.
pub const CONFIG_FILE: &str = "lore.toml";

/// Where each kind of document lives, relative to the knowledge root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub books_dir: PathBuf,
    pub articles_dir: PathBuf,
    pub checklists_dir: PathBuf,
    pub routing_file: PathBuf,
    pub catalog_file: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            books_dir: PathBuf::from("book_research"),
            articles_dir: PathBuf::from("book_research/anthropic_articles"),
            checklists_dir: PathBuf::from("knowledge/checklists"),
            routing_file: PathBuf::from("knowledge/routing.json"),
            catalog_file: PathBuf::from("knowledge/book_index.json"),
        }
    }
}

impl Layout {
    /// Directory holding source notes of `kind`.
    #[must_use]
    pub fn source_dir(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Book => &self.books_dir,
            SourceKind::Article => &self.articles_dir,
        }
    }
}

/// MCP server identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "lore".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoreConfig {
    pub layout: Layout,
    pub server: ServerConfig,
}

impl LoreConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Config`] if the TOML is malformed.
    pub fn from_toml(text: &str) -> Result<Self, LoreError> {
        toml::from_str(text).map_err(|e| LoreError::Config(e.to_string()))
    }

    /// Load `lore.toml` from a knowledge root, or the defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the file exists but cannot be read, or
    /// [`LoreError::Config`] if it is malformed.
    pub fn load(root: &Path) -> Result<Self, LoreError> {
        Self::load_file(&root.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit path, or the defaults if absent.
    ///
    /// # Errors
    ///
    /// Same as [`LoreConfig::load`].
    pub fn load_file(path: &Path) -> Result<Self, LoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

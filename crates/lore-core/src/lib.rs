//! # lore-core
//!
//! Core types shared by every lore crate:
//! - [`SourceId`] and [`SourceKind`]: book (`NN`) and article (`aNN`) identifiers
//! - [`SourceCatalog`] / [`SourceEntry`]: the `book_index.json` catalog
//! - [`RoutingTable`] / [`TaskRoute`]: the `routing.json` task routing table
//! - [`DetailLevel`]: brief/standard/detailed checklist views
//! - [`LoreConfig`]: knowledge root layout loaded from `lore.toml`
//! - Error hierarchy ([`LoreError`])
//! - Frontmatter parsing ([`frontmatter`])

pub mod catalog;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod level;
pub mod routing;
pub mod source;

pub use catalog::{SourceCatalog, SourceEntry};
pub use config::{Layout, LoreConfig, ServerConfig};
pub use error::{LoreError, Result};
pub use frontmatter::{parse_frontmatter, Frontmatter, FrontmatterValue};
pub use level::DetailLevel;
pub use routing::{RoutingTable, TaskRoute};
pub use source::{SourceId, SourceKind};

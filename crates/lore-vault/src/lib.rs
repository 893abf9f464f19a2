//! # lore-vault
//!
//! File system side of lore.
//!
//! The knowledge root is the source of truth: checklists and source notes
//! are markdown files, the routing table and catalog are JSON files.
//! [`Vault`] is the blob store over that root, [`ContentRepository`]
//! resolves identifiers and serves the read-side views, and
//! [`KnowledgeWatcher`] reports changes so caches can be reloaded.

pub mod repository;
pub mod vault;
pub mod watcher;

pub use repository::{ChecklistListing, ContentRepository, SourceListing};
pub use vault::Vault;
pub use watcher::{KnowledgeEvent, KnowledgeWatcher};

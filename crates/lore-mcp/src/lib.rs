//! # lore-mcp
//!
//! MCP (Model Context Protocol) server for a lore knowledge root.
//!
//! Exposes the knowledge operations as MCP tools:
//! - `get_checklist`: A task checklist at a detail level, optionally focused
//! - `get_source_section`: One named section of a book or article note
//! - `list_knowledge`: Available tasks, books and articles
//! - `add_source`: Register a new book or article
//! - `edit_checklist`: Add, remove or replace checklist items
//!
//! [`reload`] keeps the shared registry in step with index files edited
//! outside the server.

pub mod reload;
pub mod tools;

pub use tools::LoreMcpService;

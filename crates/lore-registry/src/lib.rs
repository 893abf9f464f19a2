//! # lore-registry
//!
//! In-memory copies of `routing.json` and `book_index.json`.
//!
//! The [`Registry`] is an explicit cache: it reads each index on first
//! use, keeps it until [`Registry::reload`], and writes it back only
//! when asked. Listings for `list_knowledge` live in [`format`].

pub mod format;
pub mod registry;

pub use format::ListCategory;
pub use registry::{DanglingSource, Loaded, Registry};

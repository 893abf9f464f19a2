//! # lore-extract
//!
//! Pure text functions over checklist and source-note markdown. There is
//! no markdown grammar here: documents are scanned line by line and
//! sections are delimited purely by `## ` heading lines.
//!
//! - [`Outline`]: the line scanner (frontmatter, preamble, sections)
//! - [`extract_named_section`] / [`extract_named_checklist_section`]
//! - [`reshape_to_items_only`], [`reshape_to_standard`], [`reshape`]
//! - [`filter_by_focus`]

pub mod outline;
pub mod section;
pub mod shape;

pub use outline::{Line, LineKind, Outline, Region, Section};
pub use section::{
    extract_named_checklist_section, extract_named_section, extract_section, heading_matcher,
    Phrase, SectionKey,
};
pub use shape::{filter_by_focus, reshape, reshape_to_items_only, reshape_to_standard};

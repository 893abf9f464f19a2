//! # lore-manage
//!
//! Write side of lore.
//!
//! [`ContentManager`] adds books and articles (writing the note, the
//! catalog entry and the routing citations) and edits checklists in
//! place. It also hosts the two maintenance audits: which checklists are
//! older than their sources, and where the indexes disagree with the
//! files on disk.

pub mod audit;
pub mod checklist;
pub mod manager;
pub mod slug;
pub mod source;

pub use audit::{Freshness, IntegrityIssue, StalenessReport, StalenessRow};
pub use checklist::{ChecklistAction, ChecklistEdit};
pub use manager::ContentManager;
pub use slug::slugify;
pub use source::{AddedSource, NewSource};

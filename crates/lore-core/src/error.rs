//! Error types for lore.

use thiserror::Error;

/// Top-level result type for lore operations.
pub type Result<T> = std::result::Result<T, LoreError>;

/// Top-level error type for lore.
///
/// Read paths never surface these to callers; they degrade to a
/// "not found" message instead. Write paths return them as-is.
#[derive(Debug, Error)]
pub enum LoreError {
    #[error("Checklist '{0}' not found.")]
    ChecklistNotFound(String),

    #[error("Section '{section}' not found in checklist '{task_type}'.")]
    SectionNotFound { task_type: String, section: String },

    #[error("Unknown action '{0}'. Use: add_items, remove_items, replace_section.")]
    UnknownAction(String),

    #[error("vault error: {0}")]
    Vault(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LoreError {
    fn from(err: serde_json::Error) -> Self {
        LoreError::Serialization(err.to_string())
    }
}

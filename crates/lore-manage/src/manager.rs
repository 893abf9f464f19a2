//! The write-side entry point.

use chrono::{Local, NaiveDate};

use lore_vault::{ContentRepository, Vault};

/// Mutates a knowledge root: new sources, checklist edits, audits.
///
/// Every stamp the manager writes uses [`ContentManager::today`], which
/// is the local date unless pinned with [`ContentManager::with_date`].
#[derive(Debug, Clone)]
pub struct ContentManager {
    repository: ContentRepository,
    today: Option<NaiveDate>,
}

impl ContentManager {
    #[must_use]
    pub fn new(vault: Vault) -> Self {
        Self {
            repository: ContentRepository::new(vault),
            today: None,
        }
    }

    /// Pin the date used for `updated` and `date` stamps.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    #[must_use]
    pub fn repository(&self) -> &ContentRepository {
        &self.repository
    }

    #[must_use]
    pub fn vault(&self) -> &Vault {
        self.repository.vault()
    }

    /// ISO date (`YYYY-MM-DD`) used for stamps.
    #[must_use]
    pub fn today(&self) -> String {
        self.today
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string()
    }
}

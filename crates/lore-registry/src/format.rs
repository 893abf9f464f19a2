//! Plain-text listings of tasks, books and articles.

use std::fmt::Write as _;
use std::str::FromStr;

use lore_core::error::LoreError;
use lore_core::{RoutingTable, SourceCatalog};

use crate::registry::Registry;

/// Which listings `list_knowledge` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListCategory {
    #[default]
    All,
    Tasks,
    Books,
    Articles,
}

impl ListCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListCategory::All => "all",
            ListCategory::Tasks => "tasks",
            ListCategory::Books => "books",
            ListCategory::Articles => "articles",
        }
    }

    fn includes(self, other: ListCategory) -> bool {
        self == ListCategory::All || self == other
    }
}

impl FromStr for ListCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(ListCategory::All),
            "tasks" => Ok(ListCategory::Tasks),
            "books" => Ok(ListCategory::Books),
            "articles" => Ok(ListCategory::Articles),
            other => Err(format!(
                "Unknown category '{other}'. Use: all, tasks, books, articles."
            )),
        }
    }
}

/// `# Available Task Checklists`, one entry per task with its primary sources.
#[must_use]
pub fn task_list(routing: &RoutingTable) -> String {
    let mut out = String::from("# Available Task Checklists\n");
    for (slug, route) in &routing.tasks {
        let _ = write!(
            out,
            "\n- **{slug}**: {}\n  Primary sources: [{}]",
            route.description,
            route.primary_sources.join(", ")
        );
    }
    out
}

/// `# Available Books`, one line per book.
#[must_use]
pub fn book_list(catalog: &SourceCatalog) -> String {
    let mut out = String::from("# Available Books\n");
    for (id, entry) in &catalog.books {
        let year = entry
            .year
            .map_or_else(|| "?".to_string(), |y| y.to_string());
        match &entry.author {
            Some(author) => {
                let _ = write!(out, "\n- [{id}] {} — {author} ({year})", entry.title);
            }
            None => {
                let _ = write!(out, "\n- [{id}] {} ({year})", entry.title);
            }
        }
    }
    out
}

/// `# Available Articles`, one line per article.
#[must_use]
pub fn article_list(catalog: &SourceCatalog) -> String {
    let mut out = String::from("# Available Articles\n");
    for (id, entry) in &catalog.articles {
        let date = entry.date.as_deref().unwrap_or("?");
        let _ = write!(out, "\n- [{id}] {} ({date})", entry.title);
    }
    out
}

impl Registry {
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn format_task_list(&mut self) -> Result<String, LoreError> {
        Ok(task_list(self.routing()?))
    }

    /// # Errors
    ///
    /// Same as [`Registry::catalog`].
    pub fn format_book_list(&mut self) -> Result<String, LoreError> {
        Ok(book_list(self.catalog()?))
    }

    /// # Errors
    ///
    /// Same as [`Registry::catalog`].
    pub fn format_article_list(&mut self) -> Result<String, LoreError> {
        Ok(article_list(self.catalog()?))
    }

    /// The listings `category` selects, separated by a blank line.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::routing`].
    pub fn format_listing(&mut self, category: ListCategory) -> Result<String, LoreError> {
        let (routing, catalog) = self.indexes()?;
        let mut parts = Vec::new();
        if category.includes(ListCategory::Tasks) {
            parts.push(task_list(routing));
        }
        if category.includes(ListCategory::Books) {
            parts.push(book_list(catalog));
        }
        if category.includes(ListCategory::Articles) {
            parts.push(article_list(catalog));
        }
        Ok(parts.join("\n\n"))
    }
}

//! MCP tool definitions for lore knowledge operations.

use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;
use tracing::{debug, warn};

use lore_core::config::ServerConfig;
use lore_core::DetailLevel;
use lore_manage::{ContentManager, NewSource};
use lore_registry::{ListCategory, Registry};
use lore_vault::{ContentRepository, Vault};

/// Lore MCP server over one knowledge root.
#[derive(Debug, Clone)]
pub struct LoreMcpService {
    repository: ContentRepository,
    manager: ContentManager,
    registry: Arc<Mutex<Registry>>,
    server: ServerConfig,
    tool_router: ToolRouter<Self>,
}

impl LoreMcpService {
    /// Create a server for the given knowledge root.
    pub fn new(vault: Vault, server: ServerConfig) -> Self {
        Self {
            repository: ContentRepository::new(vault.clone()),
            manager: ContentManager::new(vault.clone()),
            registry: Arc::new(Mutex::new(Registry::new(vault))),
            server,
            tool_router: Self::tool_router(),
        }
    }

    /// Replace the content manager, e.g. to pin the date it stamps.
    #[must_use]
    pub fn with_manager(mut self, manager: ContentManager) -> Self {
        self.manager = manager;
        self
    }

    /// The registry shared by every tool call.
    #[must_use]
    pub fn registry(&self) -> Arc<Mutex<Registry>> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn vault(&self) -> &Vault {
        self.repository.vault()
    }

    fn lock_registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| {
            warn!("registry lock poisoned, continuing");
            poisoned.into_inner()
        })
    }
}

// === Tool request types ===

/// Request for a task checklist.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetChecklistRequest {
    /// Task type slug (e.g., code_review, architecture)
    pub task_type: String,
    /// brief, standard or detailed (default: standard)
    pub detail_level: Option<String>,
    /// Comma-separated keywords; only sections whose headings mention one are kept
    pub focus: Option<String>,
}

/// Request for a section of a source note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSourceSectionRequest {
    /// Book ID (`07`) or article ID (`a07`)
    #[serde(alias = "book_id")]
    pub id: String,
    /// key_ideas, patterns, tradeoffs, pitfalls, framings, applicability or full (default: key_ideas)
    pub section: Option<String>,
}

/// Request for knowledge listings.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListKnowledgeRequest {
    /// all, tasks, books or articles (default: all)
    pub category: Option<String>,
}

/// Request to add a book or article.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddSourceRequest {
    /// Title of the book or article
    pub title: String,
    /// book, article or blog
    pub source_type: String,
    /// Markdown summary, ideally with `## Key Ideas` style sections
    pub content: String,
    /// Knowledge category (e.g., 'Architecture & System Design')
    pub category: String,
    /// Task types this source is relevant to
    pub task_types: Vec<String>,
    /// Author (books only)
    pub author: Option<String>,
    /// Publication year (books only)
    pub year: Option<i32>,
}

/// Request to edit a checklist.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditChecklistRequest {
    /// Checklist to edit
    pub task_type: String,
    /// add_items, remove_items or replace_section
    pub action: String,
    /// Section heading to target (case-insensitive substring)
    pub section: String,
    /// Lines to add, patterns to remove, or the replacement body
    pub content: String,
}

#[tool_router]
impl LoreMcpService {
    /// Task checklist at a detail level, optionally narrowed by focus.
    #[tool(
        description = "Get the checklist for a task type. detail_level: brief (items only), standard (default, drops anti-pattern sections) or detailed (raw). focus narrows to sections whose headings mention a keyword."
    )]
    fn get_checklist(&self, Parameters(req): Parameters<GetChecklistRequest>) -> String {
        let level = req
            .detail_level
            .as_deref()
            .map(DetailLevel::parse)
            .unwrap_or_default();
        debug!(task_type = %req.task_type, %level, "get_checklist");
        self.repository
            .checklist_view(&req.task_type, level, req.focus.as_deref().unwrap_or(""))
    }

    /// One named section of a book or article note.
    #[tool(
        description = "Get one section (key_ideas, patterns, tradeoffs, pitfalls, framings, applicability, or full) of a book (NN) or article (aNN) note"
    )]
    fn get_source_section(&self, Parameters(req): Parameters<GetSourceSectionRequest>) -> String {
        let section = req.section.as_deref().unwrap_or("key_ideas");
        self.repository.read_source_section(&req.id, section)
    }

    /// Listings of tasks, books and articles, re-read from disk.
    #[tool(description = "List available task checklists, books and articles (category: all, tasks, books, articles)")]
    fn list_knowledge(&self, Parameters(req): Parameters<ListKnowledgeRequest>) -> String {
        let category = match req.category.as_deref().unwrap_or("all").parse::<ListCategory>() {
            Ok(category) => category,
            Err(e) => return format!("Error: {e}"),
        };
        let mut registry = self.lock_registry();
        registry.reload();
        registry
            .format_listing(category)
            .unwrap_or_else(|e| format!("Error: {e}"))
    }

    /// Add a new source note and route it to tasks.
    #[tool(
        description = "Add a new book or article to the knowledge base. Assigns the next ID, writes the note, updates the catalog and cites it from the given task types."
    )]
    fn add_source(&self, Parameters(req): Parameters<AddSourceRequest>) -> String {
        let source = NewSource {
            title: req.title,
            source_type: req.source_type,
            content: req.content,
            category: req.category,
            task_types: req.task_types,
            author: req.author,
            year: req.year,
        };
        let mut registry = self.lock_registry();
        match self.manager.add_source(&mut registry, source) {
            Ok(added) => added.message(),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Edit a checklist in place.
    #[tool(
        description = "Update a task checklist: add_items to a section, remove_items matching patterns, or replace_section. Bumps the checklist version. replace_section fails if no heading contains the section name."
    )]
    fn edit_checklist(&self, Parameters(req): Parameters<EditChecklistRequest>) -> String {
        match self
            .manager
            .edit_checklist(&req.task_type, &req.action, &req.section, &req.content)
        {
            Ok(edit) => edit.message(),
            Err(e) => format!("Error: {e}"),
        }
    }
}

#[tool_handler]
impl ServerHandler for LoreMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Lore knowledge server. Fetch task checklists and book or article notes, \
                 list what is available, add new sources, and edit checklists."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    const CHECKLIST: &str = "---\nversion: 1\nupdated: 2024-01-01\ndescription: Review code\n---\n# Code Review\n\n## Security\n- [ ] Validate inputs [01]\n\n## Anti-Patterns\n- [ ] God objects\n\n## Testing\n- [ ] Edge cases\n";

    fn service() -> (tempfile::TempDir, LoreMcpService) {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        vault
            .write(Path::new("knowledge/checklists/code_review.md"), CHECKLIST)
            .unwrap();
        vault
            .write(
                Path::new("knowledge/routing.json"),
                r#"{"tasks": {"code_review": {"description": "Review code", "primary_sources": ["01"]}}}"#,
            )
            .unwrap();
        vault
            .write(
                Path::new("knowledge/book_index.json"),
                r#"{"books": {"01": {"title": "DDIA", "file": "book_research/01_ddia.md", "author": "Kleppmann", "year": 2017}}, "articles": {}}"#,
            )
            .unwrap();
        vault
            .write(
                Path::new("book_research/01_ddia.md"),
                "# DDIA\n\n## Key Ideas\nLogs are the truth.\n\n## Pitfalls\nClock skew.\n",
            )
            .unwrap();
        let manager = ContentManager::new(vault.clone())
            .with_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        let service = LoreMcpService::new(vault, ServerConfig::default()).with_manager(manager);
        (dir, service)
    }

    #[test]
    fn get_checklist_defaults_to_standard() {
        let (_dir, service) = service();
        let text = service.get_checklist(Parameters(GetChecklistRequest {
            task_type: "code_review".to_string(),
            detail_level: None,
            focus: None,
        }));
        assert!(text.contains("## Security"));
        assert!(!text.contains("God objects"));

        let focused = service.get_checklist(Parameters(GetChecklistRequest {
            task_type: "code_review".to_string(),
            detail_level: Some("brief".to_string()),
            focus: Some("testing".to_string()),
        }));
        assert_eq!(focused, "# Code Review\n\n## Testing\n- [ ] Edge cases");
    }

    #[test]
    fn missing_things_read_as_not_found() {
        let (_dir, service) = service();
        let text = service.get_checklist(Parameters(GetChecklistRequest {
            task_type: "nope".to_string(),
            detail_level: None,
            focus: Some("x".to_string()),
        }));
        assert_eq!(text, "Checklist 'nope' not found.");

        let text = service.get_source_section(Parameters(GetSourceSectionRequest {
            id: "01".to_string(),
            section: Some("framings".to_string()),
        }));
        assert_eq!(text, "Section 'framings' not found in source '01'.");
    }

    #[test]
    fn source_section_defaults_to_key_ideas_and_accepts_book_id() {
        let (_dir, service) = service();
        let req: GetSourceSectionRequest =
            serde_json::from_value(serde_json::json!({"book_id": "01"})).unwrap();
        let text = service.get_source_section(Parameters(req));
        assert_eq!(text, "## Key Ideas\nLogs are the truth.");
    }

    #[test]
    fn list_knowledge_reloads_and_rejects_unknown_category() {
        let (_dir, service) = service();
        let books = service.list_knowledge(Parameters(ListKnowledgeRequest {
            category: Some("books".to_string()),
        }));
        assert_eq!(books, "# Available Books\n\n- [01] DDIA — Kleppmann (2017)");

        service
            .vault()
            .write(
                Path::new("knowledge/book_index.json"),
                r#"{"books": {}, "articles": {"a01": {"title": "Agents", "file": "x.md"}}}"#,
            )
            .unwrap();
        let all = service.list_knowledge(Parameters(ListKnowledgeRequest::default()));
        assert!(all.starts_with("# Available Task Checklists\n\n- **code_review**: Review code"));
        assert!(all.ends_with("# Available Articles\n\n- [a01] Agents (?)"));

        let err = service.list_knowledge(Parameters(ListKnowledgeRequest {
            category: Some("movies".to_string()),
        }));
        assert!(err.starts_with("Error: Unknown category 'movies'"));
    }

    #[test]
    fn add_source_then_edit_checklist() {
        let (_dir, service) = service();
        let added = service.add_source(Parameters(AddSourceRequest {
            title: "My New Guide!".to_string(),
            source_type: "article".to_string(),
            content: "# Guide\n\n## Key Ideas\nShip it.\n".to_string(),
            category: "Agents".to_string(),
            task_types: vec!["code_review".to_string()],
            author: None,
            year: None,
        }));
        assert_eq!(
            added,
            "Added 'My New Guide!' as a01. File: book_research/anthropic_articles/01_my_new_guide.md. Updated routing for: code_review."
        );
        let section = service.get_source_section(Parameters(GetSourceSectionRequest {
            id: "a01".to_string(),
            section: None,
        }));
        assert_eq!(section, "## Key Ideas\nShip it.");

        let edited = service.edit_checklist(Parameters(EditChecklistRequest {
            task_type: "code_review".to_string(),
            action: "add_items".to_string(),
            section: "Security".to_string(),
            content: "- [ ] Check authz".to_string(),
        }));
        assert_eq!(
            edited,
            "Updated 'code_review' checklist: add_items in 'Security'. +3/-2 lines."
        );
    }

    #[test]
    fn edit_errors_are_rendered_as_text() {
        let (_dir, service) = service();
        let err = service.edit_checklist(Parameters(EditChecklistRequest {
            task_type: "code_review".to_string(),
            action: "merge".to_string(),
            section: "Security".to_string(),
            content: String::new(),
        }));
        assert_eq!(
            err,
            "Error: Unknown action 'merge'. Use: add_items, remove_items, replace_section."
        );

        let err = service.edit_checklist(Parameters(EditChecklistRequest {
            task_type: "code_review".to_string(),
            action: "replace_section".to_string(),
            section: "Performance".to_string(),
            content: "- [ ] Profile first".to_string(),
        }));
        assert_eq!(
            err,
            "Error: Section 'Performance' not found in checklist 'code_review'."
        );
    }

    #[test]
    fn server_info_uses_configured_name() {
        let (_dir, service) = service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "lore");
        assert!(info.capabilities.tools.is_some());
    }
}

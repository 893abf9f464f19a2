//! Maintenance audits: checklist staleness and index integrity.

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use tracing::debug;

use lore_core::error::LoreError;
use lore_core::frontmatter::parse_frontmatter;
use lore_core::{Layout, SourceId, TaskRoute};
use lore_registry::Registry;
use lore_vault::vault::to_slash;

use crate::manager::ContentManager;

/// Freshness of one routed checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// The checklist file does not exist.
    Missing,
    /// These cited sources were modified after the checklist.
    Stale(Vec<String>),
    Ok,
}

/// One row of the staleness report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessRow {
    pub task_type: String,
    /// Root-relative checklist path.
    pub checklist: String,
    pub freshness: Freshness,
    /// Frontmatter `version`, 0 when absent.
    pub version: u64,
    /// Frontmatter `updated`, `unknown` when absent.
    pub updated: String,
}

/// Staleness of every routed checklist, in task order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StalenessReport {
    pub rows: Vec<StalenessRow>,
}

impl StalenessReport {
    fn with(&self, pred: impl Fn(&Freshness) -> bool) -> Vec<&StalenessRow> {
        self.rows.iter().filter(|row| pred(&row.freshness)).collect()
    }

    #[must_use]
    pub fn missing(&self) -> Vec<&StalenessRow> {
        self.with(|f| matches!(f, Freshness::Missing))
    }

    #[must_use]
    pub fn stale(&self) -> Vec<&StalenessRow> {
        self.with(|f| matches!(f, Freshness::Stale(_)))
    }

    #[must_use]
    pub fn ok(&self) -> Vec<&StalenessRow> {
        self.with(|f| matches!(f, Freshness::Ok))
    }

    /// Plain-text report grouped MISSING, STALE, OK.
    #[must_use]
    pub fn render(&self) -> String {
        let (missing, stale, ok) = (self.missing(), self.stale(), self.ok());
        let mut out = String::from("Checklist Staleness Report\n");

        if !missing.is_empty() {
            let _ = writeln!(out, "\nMISSING ({}):", missing.len());
            for row in &missing {
                let _ = writeln!(
                    out,
                    "  - {}: Checklist file does not exist: {}",
                    row.task_type, row.checklist
                );
            }
        }
        if !stale.is_empty() {
            let _ = writeln!(out, "\nSTALE ({}):", stale.len());
            for row in &stale {
                if let Freshness::Stale(sources) = &row.freshness {
                    let _ = writeln!(
                        out,
                        "  - {} (v{}, {}): Sources newer than checklist: {}",
                        row.task_type,
                        row.version,
                        row.updated,
                        sources.join(", ")
                    );
                }
            }
        }
        let _ = writeln!(out, "\nOK ({}):", ok.len());
        for row in &ok {
            let _ = writeln!(out, "  - {} (v{}, {})", row.task_type, row.version, row.updated);
        }
        let _ = write!(
            out,
            "\nTotal: {} ok, {} stale, {} missing",
            ok.len(),
            stale.len(),
            missing.len()
        );
        out
    }
}

/// A broken link between the indexes and the files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A catalog entry points at a file that does not exist.
    MissingSourceFile { id: String, file: String },
    /// A catalog entry's filename carries a different number than its key.
    MisnumberedSourceFile { id: String, file: String },
    /// A task routes to an ID the catalog does not know.
    UnknownRoutedSource {
        task_type: String,
        list: &'static str,
        id: String,
    },
    /// A routed task has no checklist file.
    MissingChecklist { task_type: String, file: String },
    /// A checklist cites `[NN]` or `[aNN]` for an unknown source.
    UnknownCitation { checklist: String, id: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::MissingSourceFile { id, file } => {
                write!(f, "source {id}: file does not exist: {file}")
            }
            IntegrityIssue::MisnumberedSourceFile { id, file } => {
                write!(f, "source {id}: filename does not match its ID: {file}")
            }
            IntegrityIssue::UnknownRoutedSource {
                task_type,
                list,
                id,
            } => write!(f, "task {task_type}: {list} cites unknown source {id}"),
            IntegrityIssue::MissingChecklist { task_type, file } => {
                write!(f, "task {task_type}: checklist does not exist: {file}")
            }
            IntegrityIssue::UnknownCitation { checklist, id } => {
                write!(f, "checklist {checklist}: cites unknown source [{id}]")
            }
        }
    }
}

/// Checklist path for a routed task: `checklist_file` relative to the
/// routing file's directory, else `{checklists_dir}/{slug}.md`.
#[must_use]
pub fn routed_checklist_path(layout: &Layout, task_type: &str, route: &TaskRoute) -> PathBuf {
    match &route.checklist_file {
        Some(file) => layout
            .routing_file
            .parent()
            .unwrap_or(Path::new(""))
            .join(file),
        None => layout.checklists_dir.join(format!("{task_type}.md")),
    }
}

/// Source IDs cited as `[NN]` or `[aNN]` (exactly two digits).
#[must_use]
pub fn citations(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    for (start, _) in text.match_indices('[') {
        let rest = &text[start + 1..];
        let len = if rest.starts_with('a') { 3 } else { 2 };
        let Some(candidate) = rest.get(..len) else {
            continue;
        };
        let digits = candidate.strip_prefix('a').unwrap_or(candidate);
        if digits.len() == 2
            && digits.bytes().all(|b| b.is_ascii_digit())
            && rest[len..].starts_with(']')
        {
            found.push(candidate);
        }
    }
    found
}

impl ContentManager {
    /// Compare each routed checklist's mtime with its cited sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the routing table cannot be loaded, or a
    /// checklist exists but cannot be read.
    pub fn staleness_report(&self, registry: &mut Registry) -> Result<StalenessReport, LoreError> {
        let vault = self.vault();
        let repository = self.repository();
        let mut rows = Vec::new();

        for (task_type, route) in &registry.routing()?.tasks {
            let path = routed_checklist_path(vault.layout(), task_type, route);
            let checklist = to_slash(&path);
            let Some(checklist_mtime) = vault.exists(&path).then(|| vault.modified(&path)) else {
                rows.push(StalenessRow {
                    task_type: task_type.clone(),
                    checklist,
                    freshness: Freshness::Missing,
                    version: 0,
                    updated: "unknown".to_string(),
                });
                continue;
            };

            let text = vault.read(&path)?;
            let (meta, _) = parse_frontmatter(&text);
            let version = meta
                .scalar("version")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let updated = meta.scalar("updated").unwrap_or("unknown").to_string();

            let stale: Vec<String> = route
                .cited_sources()
                .filter(|(_, id)| {
                    let source_mtime = SourceId::parse(id)
                        .and_then(|sid| repository.resolve_source_path(&sid))
                        .and_then(|p| vault.modified(&p));
                    matches!((source_mtime, checklist_mtime), (Some(s), Some(c)) if s > c)
                })
                .map(|(_, id)| id.to_string())
                .collect();
            debug!(task_type = %task_type, stale = stale.len(), "staleness checked");

            rows.push(StalenessRow {
                task_type: task_type.clone(),
                checklist,
                freshness: if stale.is_empty() {
                    Freshness::Ok
                } else {
                    Freshness::Stale(stale)
                },
                version,
                updated,
            });
        }
        Ok(StalenessReport { rows })
    }

    /// Every integrity issue across catalog, routing and checklists.
    ///
    /// # Errors
    ///
    /// Returns an error if an index cannot be loaded or a checklist
    /// cannot be read.
    pub fn integrity_issues(&self, registry: &mut Registry) -> Result<Vec<IntegrityIssue>, LoreError> {
        let vault = self.vault();
        let mut issues = Vec::new();

        for dangling in registry.dangling_sources()? {
            issues.push(IntegrityIssue::UnknownRoutedSource {
                task_type: dangling.task_type,
                list: dangling.list,
                id: dangling.id,
            });
        }

        let (routing, catalog) = registry.indexes()?;

        for (_, key, entry) in catalog.entries() {
            let rel = Path::new(&entry.file);
            if !vault.exists(rel) {
                issues.push(IntegrityIssue::MissingSourceFile {
                    id: key.to_string(),
                    file: entry.file.clone(),
                });
            }
            let numbered = SourceId::parse(key).is_some_and(|id| {
                rel.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&format!("{}_", id.digits())))
            });
            if !numbered {
                issues.push(IntegrityIssue::MisnumberedSourceFile {
                    id: key.to_string(),
                    file: entry.file.clone(),
                });
            }
        }

        for (task_type, route) in &routing.tasks {
            let path = routed_checklist_path(vault.layout(), task_type, route);
            if !vault.exists(&path) {
                issues.push(IntegrityIssue::MissingChecklist {
                    task_type: task_type.clone(),
                    file: to_slash(&path),
                });
            }
        }

        let dir = &vault.layout().checklists_dir;
        for name in vault.list(dir)? {
            let Some(slug) = name.strip_suffix(".md") else {
                continue;
            };
            let text = vault.read(&dir.join(&name))?;
            let mut reported = Vec::new();
            for id in citations(&text) {
                if !catalog.contains_key(id) && !reported.contains(&id) {
                    reported.push(id);
                    issues.push(IntegrityIssue::UnknownCitation {
                        checklist: slug.to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }
        Ok(issues)
    }
}

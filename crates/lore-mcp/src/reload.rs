//! Live reload of the shared registry.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use lore_core::error::LoreError;
use lore_registry::Registry;
use lore_vault::{KnowledgeEvent, KnowledgeWatcher};

/// Watch `root` and reload `registry` whenever an index JSON file changes.
/// Markdown changes need no reload since reads go straight to disk.
///
/// The thread runs until the watcher's channel closes.
///
/// # Errors
///
/// Returns [`LoreError::Io`] if the watcher cannot be started.
pub fn spawn_index_reloader(
    root: &Path,
    registry: Arc<Mutex<Registry>>,
) -> Result<JoinHandle<()>, LoreError> {
    let watcher = KnowledgeWatcher::start(root)?;
    info!(root = %root.display(), "watching for index changes");
    Ok(thread::spawn(move || {
        while let Some(event) = watcher.recv() {
            match event {
                KnowledgeEvent::IndexChanged(path) => {
                    debug!(path = %path.display(), "index changed, reloading registry");
                    registry
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .reload();
                }
                KnowledgeEvent::DocumentChanged(path) | KnowledgeEvent::DocumentRemoved(path) => {
                    debug!(path = %path.display(), "document changed");
                }
            }
        }
    }))
}

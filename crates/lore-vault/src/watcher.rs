//! File system watcher for the knowledge root.
//!
//! Uses the `notify` crate for cross-platform file system events
//! (FSEvents on macOS, inotify on Linux, ReadDirectoryChanges on Windows).
//! JSON changes are reported separately so the registry can be reloaded
//! without reacting to every checklist edit.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use lore_core::error::LoreError;

/// Events emitted by the knowledge watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeEvent {
    /// A JSON index (routing table or catalog) was created, modified or removed.
    IndexChanged(PathBuf),
    /// A markdown document was created or modified.
    DocumentChanged(PathBuf),
    /// A markdown document was deleted.
    DocumentRemoved(PathBuf),
}

/// Watches a knowledge root for changes and emits events.
pub struct KnowledgeWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::Receiver<KnowledgeEvent>,
}

impl KnowledgeWatcher {
    /// Start watching a knowledge root recursively.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the watcher cannot be created.
    pub fn start(root: &Path) -> Result<Self, LoreError> {
        let (tx, rx) = mpsc::channel();
        let root_owned = root.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let Ok(event) = res else {
                return;
            };
            for path in &event.paths {
                // Skip hidden directories (.git, editor swap dirs)
                if path
                    .strip_prefix(&root_owned)
                    .ok()
                    .and_then(|rel| rel.components().next())
                    .and_then(|c| c.as_os_str().to_str())
                    .is_some_and(|s| s.starts_with('.'))
                {
                    continue;
                }

                let ext = path.extension().and_then(|e| e.to_str());
                let knowledge_event = match (ext, event.kind) {
                    (
                        Some("json"),
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_),
                    ) => KnowledgeEvent::IndexChanged(path.clone()),
                    (Some("md"), EventKind::Create(_) | EventKind::Modify(_)) => {
                        KnowledgeEvent::DocumentChanged(path.clone())
                    }
                    (Some("md"), EventKind::Remove(_)) => {
                        KnowledgeEvent::DocumentRemoved(path.clone())
                    }
                    _ => continue,
                };
                let _ = tx.send(knowledge_event);
            }
        })
        .map_err(|e| LoreError::Io(std::io::Error::other(e)))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| LoreError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Block until the next event. Returns `None` once the watcher is gone.
    pub fn recv(&self) -> Option<KnowledgeEvent> {
        self.receiver.recv().ok()
    }

    /// Try to receive the next event with a timeout.
    ///
    /// Returns `None` if no event is available within the timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<KnowledgeEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

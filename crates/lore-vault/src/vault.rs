//! Blob store over the knowledge root.
//!
//! Every path handed to a [`Vault`] is relative to the root. There is no
//! locking: the last writer wins.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use lore_core::config::{Layout, LoreConfig};
use lore_core::error::LoreError;

/// A knowledge root plus its directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    root: PathBuf,
    layout: Layout,
}

impl Vault {
    /// Open a knowledge root, reading `lore.toml` from it if present.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Vault`] if `root` is not a directory, or a
    /// config error if `lore.toml` is malformed.
    pub fn open(root: &Path) -> Result<Self, LoreError> {
        let config = LoreConfig::load(root)?;
        Self::open_with(root, config.layout)
    }

    /// Open a knowledge root with an explicit layout.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Vault`] if `root` is not a directory.
    pub fn open_with(root: &Path, layout: Layout) -> Result<Self, LoreError> {
        if !root.is_dir() {
            return Err(LoreError::Vault(format!(
                "knowledge root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            layout,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Absolute path for a root-relative path.
    #[must_use]
    pub fn path(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    #[must_use]
    pub fn exists(&self, rel: &Path) -> bool {
        self.path(rel).is_file()
    }

    /// Read a UTF-8 file.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the file is missing or unreadable.
    pub fn read(&self, rel: &Path) -> Result<String, LoreError> {
        debug!(path = %rel.display(), "reading");
        Ok(fs::read_to_string(self.path(rel))?)
    }

    /// Write a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if a directory or the file cannot be written.
    pub fn write(&self, rel: &Path, content: &str) -> Result<(), LoreError> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %rel.display(), bytes = content.len(), "writing");
        fs::write(path, content)?;
        Ok(())
    }

    /// File names in a root-relative directory, sorted. A missing
    /// directory lists as empty.
    ///
    /// # Errors
    ///
    /// Returns [`LoreError::Io`] if the directory exists but cannot be read.
    pub fn list(&self, dir: &Path) -> Result<Vec<String>, LoreError> {
        let path = self.path(dir);
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Modification time of a file, if it exists.
    #[must_use]
    pub fn modified(&self, rel: &Path) -> Option<SystemTime> {
        fs::metadata(self.path(rel)).and_then(|m| m.modified()).ok()
    }
}

/// Render a relative path with `/` separators, as stored in the catalog.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = Vault::open(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LoreError::Vault(_)));
    }

    #[test]
    fn write_creates_parents_and_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        let rel = Path::new("deep/nested/note.md");

        assert!(!vault.exists(rel));
        vault.write(rel, "# Note\n").unwrap();
        assert!(vault.exists(rel));
        assert_eq!(vault.read(rel).unwrap(), "# Note\n");
        assert!(vault.modified(rel).is_some());
    }

    #[test]
    fn list_is_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        vault.write(Path::new("d/b.md"), "").unwrap();
        vault.write(Path::new("d/a.md"), "").unwrap();
        vault.write(Path::new("d/sub/c.md"), "").unwrap();

        assert_eq!(vault.list(Path::new("d")).unwrap(), vec!["a.md", "b.md"]);
        assert!(vault.list(Path::new("missing")).unwrap().is_empty());
    }

    #[test]
    fn open_reads_layout_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lore.toml"),
            "[layout]\nchecklists_dir = \"lists\"\n",
        )
        .unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        assert_eq!(vault.layout().checklists_dir, PathBuf::from("lists"));
    }

    #[test]
    fn to_slash_joins_components() {
        assert_eq!(
            to_slash(Path::new("book_research/anthropic_articles/01_x.md")),
            "book_research/anthropic_articles/01_x.md"
        );
    }
}

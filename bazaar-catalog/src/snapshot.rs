// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! JSON mirror of the catalog.
//!
//! The snapshot is a human-readable copy of every item added through this
//! process, stored as `{"items": [...]}`. It is loaded once at startup and
//! rewritten in full after each mutation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::error::{Error, IoErrorContext, Result};
use crate::item::Item;

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    items: &'a [Item],
}

#[derive(Deserialize)]
struct StoredSnapshot {
    // older writers emitted `null` for an empty catalog
    #[serde(default)]
    items: Option<Vec<Item>>,
}

/// In-memory copy of the snapshot document plus the path it lives at.
#[derive(Debug)]
pub struct Snapshot {
    path: PathBuf,
    items: Vec<Item>,
}

impl Snapshot {
    /// An empty snapshot that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: Vec::new(),
        }
    }

    /// Load the snapshot at `path`.
    ///
    /// A missing file yields an empty snapshot. An unreadable or malformed
    /// document is logged and also yields an empty snapshot; startup never
    /// fails because of the mirror.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", path.display());
                return Self::empty(path);
            }
            Err(e) => {
                error!("Failed to read snapshot {}: {}", path.display(), e);
                return Self::empty(path);
            }
        };

        match serde_json::from_slice::<StoredSnapshot>(&contents) {
            Ok(stored) => {
                let items = stored.items.unwrap_or_default();
                debug!("Loaded {} items from {}", items.len(), path.display());
                Self { path, items }
            }
            Err(e) => {
                error!("Malformed snapshot {}: {}", path.display(), e);
                Self::empty(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest item id held by the mirror.
    pub fn last_id(&self) -> Option<i64> {
        self.items.iter().map(|item| item.id).max()
    }

    /// Linear scan for an item by id.
    pub fn get(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn push(&mut self, item: Item) {
        if self.get(item.id).is_some() {
            warn!("Snapshot already holds item {}, appending anyway", item.id);
        }
        self.items.push(item);
    }

    /// Write the full document next to the target and rename it into place.
    pub fn persist(&self) -> Result<()> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        SnapshotDocument { items: &self.items }.serialize(&mut serializer)?;
        buf.push(b'\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .io_context(format!("Failed to create snapshot directory {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir).io_context(format!(
            "Failed to create temporary snapshot in {}",
            dir.display()
        ))?;
        tmp.write_all(&buf).io_context("Failed to write snapshot")?;
        tmp.as_file()
            .sync_all()
            .io_context("Failed to flush snapshot")?;
        tmp.persist(&self.path).map_err(|e| Error::Io {
            context: format!("Failed to replace snapshot {}", self.path.display()),
            source: e.error,
        })?;

        debug!("Wrote {} items to {}", self.items.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            category: "fashion".to_string(),
            image_filename: format!("{id}.jpg"),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::load(tmp.path().join("items.json"));
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.last_id(), None);
        assert_eq!(snapshot.path(), tmp.path().join("items.json"));
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");
        fs::write(&path, b"{\"items\": [ not json").unwrap();

        let snapshot = Snapshot::load(&path);
        assert!(snapshot.is_empty());
        // the malformed document is left alone until the next write
        assert_eq!(fs::read(&path).unwrap(), b"{\"items\": [ not json");
    }

    #[test]
    fn test_null_items_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");
        fs::write(&path, b"{\"items\": null}").unwrap();
        assert!(Snapshot::load(&path).is_empty());
    }

    #[test]
    fn test_persist_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");

        let mut snapshot = Snapshot::load(&path);
        snapshot.push(item(1, "jacket"));
        snapshot.push(item(2, "hat"));
        snapshot.persist().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"items\": ["));
        assert!(text.ends_with("}\n"));

        let reloaded = Snapshot::load(&path);
        assert_eq!(reloaded.items(), snapshot.items());
        assert_eq!(reloaded.last_id(), Some(2));
        assert_eq!(reloaded.get(2).unwrap().name, "hat");
        assert!(reloaded.get(3).is_none());
    }

    #[test]
    fn test_persist_replaces_whole_document() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");
        fs::write(&path, "x".repeat(4096)).unwrap();

        let mut snapshot = Snapshot::empty(&path);
        snapshot.push(item(7, "scarf"));
        snapshot.persist().unwrap();

        let reloaded = Snapshot::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.items()[0], item(7, "scarf"));

        // only the snapshot itself remains, no temporary files
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}

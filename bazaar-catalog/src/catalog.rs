// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Two-tier item repository.
//!
//! SQLite is the primary store and the only source of item identifiers. The
//! snapshot mirror holds copies of items added through this process and of
//! whatever the snapshot file contained at startup.
//!
//! Reads consult the primary first. Mirror entries are served only for ids
//! the primary does not have, so when both hold an id the primary wins. The
//! two stores can disagree after a failed snapshot write (the row is committed,
//! the file is stale) until the next successful write rewrites the file from
//! the in-memory mirror.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bazaar_store_db::{NewItem, OpenMode, StoreDb};
use tracing::{debug, error, info};

use crate::error::{Error, IoErrorContext, Result};
use crate::image::ImageStore;
use crate::item::{Item, NewItemRequest};
use crate::snapshot::Snapshot;

/// Locations of the three pieces of persisted state.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// SQLite database file
    pub database: PathBuf,
    /// Directory of `.jpg` blobs
    pub images: PathBuf,
    /// JSON snapshot document
    pub snapshot: PathBuf,
}

/// Reject an add-item request with an empty name or category.
pub fn validate(name: &str, category: &str) -> Result<()> {
    if name.is_empty() || category.is_empty() {
        return Err(Error::Validation("name and category are required".to_string()));
    }
    Ok(())
}

/// The item catalog.
///
/// All mutations pass through one write gate, so category resolution, the
/// image write, the row insert and the snapshot rewrite of one add never
/// interleave with another add. Reads only take the connection lock for the
/// duration of a query.
pub struct Catalog {
    db: Mutex<StoreDb>,
    images: ImageStore,
    mirror: RwLock<Snapshot>,
    write_gate: Mutex<()>,
}

impl Catalog {
    pub fn new(db: StoreDb, images: ImageStore, mirror: Snapshot) -> Self {
        Self {
            db: Mutex::new(db),
            images,
            mirror: RwLock::new(mirror),
            write_gate: Mutex::new(()),
        }
    }

    /// Open the database (creating it and its schema if needed) and load the
    /// snapshot.
    pub fn open(config: &CatalogConfig) -> Result<Self> {
        if let Some(parent) = config.database.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).io_context(format!(
                    "Failed to create database directory {}",
                    parent.display()
                ))?;
            }
        }
        let db = StoreDb::open(&config.database, OpenMode::Create)?;
        let mirror = Snapshot::load(&config.snapshot);
        info!(
            "Catalog opened: {} items in database, {} in snapshot (last id {:?})",
            db.count_items()?,
            mirror.len(),
            mirror.last_id()
        );
        Ok(Self::new(db, ImageStore::new(&config.images), mirror))
    }

    fn db(&self) -> MutexGuard<'_, StoreDb> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mirror(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.mirror.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn mirror_mut(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.mirror.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an item: resolve its category, store its image, insert the row and
    /// rewrite the snapshot.
    ///
    /// Validation happens before any side effect. A failure after the image
    /// is written does not remove the blob.
    pub fn add(&self, request: NewItemRequest) -> Result<Item> {
        validate(&request.name, &request.category)?;

        let _gate = self.write_gate.lock().unwrap_or_else(PoisonError::into_inner);

        let category_id = self.db().resolve_category(&request.category)?;
        let image_filename = self.images.put(&request.image)?;
        let id = self.db().insert_item(&NewItem {
            name: request.name.clone(),
            category_id,
            image_name: image_filename.clone(),
        })?;

        let item = Item {
            id,
            name: request.name,
            category: request.category,
            image_filename,
        };
        self.mirror_mut().push(item.clone());

        // Only the gate holder mutates the mirror, so a read guard is enough
        // to write a consistent document.
        if let Err(e) = self.mirror().persist() {
            error!("Item {} stored but snapshot write failed: {}", id, e);
            return Err(e);
        }

        info!(
            "Added item {}: {}, category: {}",
            item.id, item.name, item.category
        );
        Ok(item)
    }

    /// Fetch one item, from the primary store or else the mirror.
    pub fn get(&self, id: i64) -> Result<Item> {
        let row = self.db().query_item(id)?;
        if let Some(row) = row {
            return Ok(row.into());
        }

        match self.mirror().get(id) {
            Some(item) => {
                debug!("Item {} served from snapshot", id);
                Ok(item.clone())
            }
            None => Err(Error::NotFound(id)),
        }
    }

    /// All items: primary rows in insertion order, then mirror-only entries.
    pub fn list(&self) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .db()
            .query_items()?
            .into_iter()
            .map(Item::from)
            .collect();

        let known: HashSet<i64> = items.iter().map(|item| item.id).collect();
        items.extend(
            self.mirror()
                .items()
                .iter()
                .filter(|item| !known.contains(&item.id))
                .cloned(),
        );
        Ok(items)
    }

    /// Items whose name contains `keyword` (case-sensitive).
    pub fn search(&self, keyword: &str) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .db()
            .search_items(keyword)?
            .into_iter()
            .map(Item::from)
            .collect();

        let candidates: Vec<Item> = self
            .mirror()
            .items()
            .iter()
            .filter(|item| item.name.contains(keyword))
            .cloned()
            .collect();

        let db = self.db();
        for item in candidates {
            if db.query_item(item.id)?.is_none() {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Path of the blob to serve for `filename`.
    pub fn image(&self, filename: &str) -> Result<PathBuf> {
        self.images.resolve(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn memory_catalog() -> (tempfile::TempDir, Catalog) {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(
            StoreDb::open_memory().unwrap(),
            ImageStore::new(tmp.path().join("images")),
            Snapshot::load(tmp.path().join("items.json")),
        );
        (tmp, catalog)
    }

    fn request(name: &str, category: &str) -> NewItemRequest {
        NewItemRequest {
            name: name.to_string(),
            category: category.to_string(),
            image: b"JPEGDATA".to_vec(),
        }
    }

    #[rstest]
    #[case::empty_name("", "fashion")]
    #[case::empty_category("jacket", "")]
    #[case::both_empty("", "")]
    fn test_validation_has_no_side_effects(#[case] name: &str, #[case] category: &str) {
        let (tmp, catalog) = memory_catalog();

        let err = catalog.add(request(name, category)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(catalog.db().query_category("fashion").unwrap().is_none());
        assert!(!tmp.path().join("images").exists());
        assert!(!tmp.path().join("items.json").exists());
    }

    #[test]
    fn test_primary_wins_over_mirror() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mirror = Snapshot::empty(tmp.path().join("items.json"));
        mirror.push(Item {
            id: 1,
            name: "stale".into(),
            category: "old".into(),
            image_filename: "default.jpg".into(),
        });
        let catalog = Catalog::new(
            StoreDb::open_memory().unwrap(),
            ImageStore::new(tmp.path().join("images")),
            mirror,
        );

        // before the primary has id 1 the mirror answers
        assert_eq!(catalog.get(1).unwrap().name, "stale");

        let added = catalog.add(request("fresh", "new")).unwrap();
        assert_eq!(added.id, 1);
        assert_eq!(catalog.get(1).unwrap().name, "fresh");

        let names: Vec<String> = catalog.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["fresh"]);
        assert!(catalog.search("stale").unwrap().is_empty());
    }
}

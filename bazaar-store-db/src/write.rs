// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Write operations for the catalog database.

use rusqlite::params;
use tracing::debug;

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::NewItem;

impl StoreDb {
    /// Map a category name to its identifier, creating the row on first use.
    ///
    /// The `unique` constraint on `category.name` decides races between
    /// connections: the losing insert is ignored and the winner's id is read
    /// back.
    pub fn resolve_category(&self, name: &str) -> Result<i64> {
        if let Some(category) = self.query_category(name)? {
            return Ok(category.id);
        }

        let inserted = self.conn.execute(
            "INSERT INTO category (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        if inserted > 0 {
            let id = self.conn.last_insert_rowid();
            debug!("Created category '{}' with id {}", name, id);
            return Ok(id);
        }

        let id = self.conn.query_row(
            "SELECT id FROM category WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert a new item row.
    ///
    /// Returns the database ID of the new item.
    pub fn insert_item(&self, item: &NewItem) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO items (name, category_id, image_name) VALUES (?1, ?2, ?3)",
            params![item.name, item.category_id, item.image_name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

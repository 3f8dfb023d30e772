// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Read query operations for the catalog database.

use rusqlite::{OptionalExtension, Row, params};

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::{Category, ItemRow};

const ITEM_COLUMNS: &str = r#"
    SELECT items.id, items.name, category.name, items.image_name
    FROM items
    JOIN category ON items.category_id = category.id
"#;

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        image_name: row.get(3)?,
    })
}

impl StoreDb {
    /// Query an item by its identifier.
    ///
    /// Returns `None` if no row has that id.
    pub fn query_item(&self, id: i64) -> Result<Option<ItemRow>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{ITEM_COLUMNS} WHERE items.id = ?1"))?;
        Ok(stmt.query_row(params![id], item_from_row).optional()?)
    }

    /// Get all items in insertion order.
    pub fn query_items(&self) -> Result<Vec<ItemRow>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{ITEM_COLUMNS} ORDER BY items.id"))?;

        let mut items = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            items.push(item_from_row(row)?);
        }
        Ok(items)
    }

    /// Find items whose name contains `keyword`.
    ///
    /// Matching is case-sensitive and ignores the category name. `LIKE` would
    /// fold ASCII case, so this uses `instr` instead.
    pub fn search_items(&self, keyword: &str) -> Result<Vec<ItemRow>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{ITEM_COLUMNS} WHERE instr(items.name, ?1) > 0 ORDER BY items.id"
        ))?;

        let mut items = Vec::new();
        let mut rows = stmt.query(params![keyword])?;
        while let Some(row) = rows.next()? {
            items.push(item_from_row(row)?);
        }
        Ok(items)
    }

    /// Look up a category by name.
    pub fn query_category(&self, name: &str) -> Result<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM category WHERE name = ?1")?;
        Ok(stmt
            .query_row(params![name], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?)
    }

    /// Count the number of items.
    pub fn count_items(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

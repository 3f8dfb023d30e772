// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

use bazaar_store_db::ItemRow;
use serde::{Deserialize, Serialize};

/// A catalog entry as served to clients and stored in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_filename: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            image_filename: row.image_name,
        }
    }
}

/// Input of an add-item operation, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewItemRequest {
    pub name: String,
    /// Category name; resolved to an id on insert
    pub category: String,
    /// Raw image bytes
    pub image: Vec<u8>,
}

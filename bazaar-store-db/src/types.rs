// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Database row types for the item catalog.

/// A row from the `category` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Database row ID
    pub id: i64,
    /// Unique category name
    pub name: String,
}

/// A row from the `items` table joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    /// Database row ID, assigned by autoincrement
    pub id: i64,
    /// Item name
    pub name: String,
    /// Name of the referenced category
    pub category: String,
    /// Content-addressed image filename (`<sha256>.jpg`)
    pub image_name: String,
}

/// Parameters for inserting a new item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    /// ID of an existing category row
    pub category_id: i64,
    pub image_name: String,
}

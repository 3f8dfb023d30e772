// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! SQLite database interface for the item catalog.
//!
//! This crate owns the relational half of the catalog: the `category` and
//! `items` tables, category resolution, and the item queries served over HTTP.
//!
//! **Architecture**: This is the primary store. The JSON snapshot kept by
//! `bazaar-catalog` is a read replica of what is written here.
//!
//! # Key Features
//!
//! - Idempotent schema creation (`category`, `items`)
//! - Category resolution with insert-on-miss
//! - Autoincrement item identifiers that are never reused
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use bazaar_store_db::{NewItem, OpenMode, StoreDb};
//!
//! let mut db = StoreDb::open("mercari.sqlite3", OpenMode::Create)?;
//! let category_id = db.resolve_category("fashion")?;
//! let id = db.insert_item(&NewItem {
//!     name: "jacket".into(),
//!     category_id,
//!     image_name: "0123abcd.jpg".into(),
//! })?;
//! assert!(db.query_item(id)?.is_some());
//! ```

mod connection;
mod error;
mod query;
mod schema;
mod types;
mod write;

pub use connection::{OpenMode, StoreDb};
pub use error::{Error, Result};
pub use schema::SCHEMA_SQL;
pub use types::*;

// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::SCHEMA_SQL;

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access to an existing database
    ReadOnly,
    /// Read-write access to an existing database
    ReadWrite,
    /// Create the database and its schema if they don't exist
    Create,
}

/// SQLite database connection for catalog data.
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open or create a database at a custom path.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let flags = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };

        match mode {
            OpenMode::Create => {
                db.configure_pragmas()?;
                db.create_schema()?;
            }
            OpenMode::ReadWrite => {
                db.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            }
            OpenMode::ReadOnly => {}
        }

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure_pragmas()?;
        db.create_schema()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            "#,
        )?;
        Ok(())
    }

    /// Create the catalog schema. Safe to call on an existing database.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        debug!("Created database schema");
        Ok(())
    }

    /// Check if the database has the catalog tables.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('items', 'category')",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 2)
    }
}

// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Error types for catalog database operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during catalog database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),
}

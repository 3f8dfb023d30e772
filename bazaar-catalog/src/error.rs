// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Error types for catalog operations.

use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing the catalog.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was missing or empty
    #[error("{0}")]
    Validation(String),

    /// No item with this id exists in either store
    #[error("Item not found: {0}")]
    NotFound(i64),

    /// Image filename without the `.jpg` extension, or not a plain file name
    #[error("Invalid image path: {0}")]
    InvalidPath(String),

    #[error("Store error: {0}")]
    Store(#[from] bazaar_store_db::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot document could not be encoded
    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Extension trait for adding context to IO errors
pub trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io {
            context: context.into(),
            source: e,
        })
    }
}

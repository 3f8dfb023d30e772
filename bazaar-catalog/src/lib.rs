// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Item catalog backed by two stores.
//!
//! Items are written to SQLite (through `bazaar-store-db`) and mirrored into a
//! JSON snapshot on disk. Images are stored once per distinct content, named
//! after the SHA-256 digest of their bytes.
//!
//! [`Catalog`] is the single entry point; which store answered a read is an
//! implementation detail.

mod catalog;
mod error;
mod image;
mod item;
mod snapshot;

pub use catalog::{Catalog, CatalogConfig, validate};
pub use error::{Error, IoErrorContext, Result};
pub use image::{DEFAULT_IMAGE, IMAGE_EXTENSION, ImageStore, digest_filename};
pub use item::{Item, NewItemRequest};
pub use snapshot::Snapshot;

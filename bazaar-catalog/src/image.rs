// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Content-addressed image storage.
//!
//! Every blob is named `<sha256-hex>.jpg`, so uploading the same bytes twice
//! resolves to the same file and the second write is skipped.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, IoErrorContext, Result};

/// Extension of every stored blob.
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Blob served in place of any image that is not stored.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// Returns the filename under which `bytes` are stored.
pub fn digest_filename(bytes: &[u8]) -> String {
    format!("{}{IMAGE_EXTENSION}", hex::encode(Sha256::digest(bytes)))
}

/// Directory of image blobs keyed by content digest.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `bytes` and return the filename to attach to an item.
    ///
    /// The directory is created on first use. New blobs are written to a
    /// temporary file and renamed into place, so a digest name never points at
    /// a partially written file.
    pub fn put(&self, bytes: &[u8]) -> Result<String> {
        let filename = digest_filename(bytes);
        let dest = self.dir.join(&filename);

        if dest.is_file() {
            debug!("Image {} already stored", filename);
            return Ok(filename);
        }

        fs::create_dir_all(&self.dir).io_context(format!(
            "Failed to create image directory {}",
            self.dir.display()
        ))?;

        let mut tmp = NamedTempFile::new_in(&self.dir).io_context(format!(
            "Failed to create temporary image in {}",
            self.dir.display()
        ))?;
        tmp.write_all(bytes)
            .io_context(format!("Failed to write image {filename}"))?;
        tmp.as_file()
            .sync_all()
            .io_context(format!("Failed to flush image {filename}"))?;
        tmp.persist(&dest).map_err(|e| Error::Io {
            context: format!("Failed to move image into place at {}", dest.display()),
            source: e.error,
        })?;

        debug!("Stored image {} ({} bytes)", filename, bytes.len());
        Ok(filename)
    }

    /// Whether a blob with this filename is stored.
    pub fn contains(&self, filename: &str) -> bool {
        is_plain_file_name(filename) && self.dir.join(filename).is_file()
    }

    /// Resolve `filename` to the path that should be served.
    ///
    /// Names without the `.jpg` extension are rejected whether or not such a
    /// file exists. A name that is not stored resolves to [`DEFAULT_IMAGE`].
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if !filename.ends_with(IMAGE_EXTENSION) {
            return Err(Error::InvalidPath(format!(
                "image path does not end with {IMAGE_EXTENSION}: {filename}"
            )));
        }
        if !is_plain_file_name(filename) {
            return Err(Error::InvalidPath(format!(
                "image path must be a plain file name: {filename}"
            )));
        }

        let path = self.dir.join(filename);
        if path.is_file() {
            return Ok(path);
        }

        debug!("Image not found: {}, serving {}", filename, DEFAULT_IMAGE);
        Ok(self.dir.join(DEFAULT_IMAGE))
    }

    /// Read the bytes that [`resolve`](Self::resolve) points at.
    ///
    /// A missing default blob surfaces as an I/O error.
    pub fn get(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        fs::read(&path).io_context(format!("Failed to read image {}", path.display()))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

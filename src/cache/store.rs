//! Verbatim blob store keyed by continuation token
//!
//! Provides an `ArchiveStore` that persists raw API response pages to disk
//! under `archive_<key>.json`, where `<key>` is derived from the continuation
//! token that was used to request the page. Blobs are write-once and never
//! re-serialized; the reader gets back the exact bytes the writer stored.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed key for the page fetched with no continuation token.
///
/// Padded base64 output is always a multiple of 4 characters long, so no
/// encoded token can collide with this 10-character literal.
pub const FIRST_PAGE_KEY: &str = "first-page";

/// Derives the filesystem-safe cache key for a continuation token.
///
/// The empty token denotes the first page and maps to [`FIRST_PAGE_KEY`];
/// any other token is URL-safe base64 of its UTF-8 bytes. The function is
/// pure: the same token always yields the same key, and distinct tokens
/// yield distinct keys.
pub fn derive_key(token: &str) -> String {
    if token.is_empty() {
        FIRST_PAGE_KEY.to_string()
    } else {
        URL_SAFE.encode(token.as_bytes())
    }
}

/// Reads and writes cached pages in a single flat directory
///
/// The store holds no state beyond the directory path. There is no index or
/// manifest; a correctly-named file is the only existence signal. The fetcher
/// writes blobs once and the server reads them; neither mutates or deletes.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    /// Directory where page blobs are stored
    dir: PathBuf,
}

impl ArchiveStore {
    /// Creates a store over the given directory
    ///
    /// The directory is not created until [`ensure_dir`](Self::ensure_dir)
    /// or the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the blob path for a cache key
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("archive_{}.json", key))
    }

    /// Returns the directory this store reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures the archive directory exists (idempotent)
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Writes one page verbatim under the key for `token`
    ///
    /// `token` is the continuation token that was used as *input* for the
    /// request that produced `bytes`, not any token found inside the page.
    /// Pass the empty string for the first page.
    pub fn write_page(&self, token: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.ensure_dir()?;
        fs::write(self.blob_path(&derive_key(token)), bytes)
    }

    /// Reads the page stored under the key for `token`
    ///
    /// Returns `None` if no blob exists for the key. Bytes are returned
    /// exactly as written.
    pub fn read_page(&self, token: &str) -> Option<Vec<u8>> {
        self.read_key(&derive_key(token))
    }

    /// Reads the page stored under an already-derived cache key
    pub fn read_key(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.blob_path(key)).ok()
    }
}

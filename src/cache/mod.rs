//! Archive store for cached API pages
//!
//! This module provides the on-disk blob store shared by the fetcher (writer)
//! and the cache server (reader). Pages are stored verbatim under filenames
//! derived from the continuation token that requested them, so both sides must
//! agree on one key derivation function. It lives here and nowhere else.

mod store;

pub use store::{derive_key, ArchiveStore, FIRST_PAGE_KEY};

//! adrmirror library
//!
//! Mirrors a MediaWiki wiki's deleted-revision history via the
//! `alldeletedrevisions` API and re-serves the cached pages over HTTP.
//! Exposed as a library so integration tests can drive the fetcher and
//! server directly.

pub mod api;
pub mod cache;
pub mod cli;
pub mod query;
pub mod server;

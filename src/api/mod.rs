//! Remote MediaWiki API clients
//!
//! This module contains everything that talks to the remote wiki: the login
//! handshake that establishes a session, and the fetcher that walks the
//! paginated `alldeletedrevisions` listing and persists every page.

pub mod fetcher;
pub mod session;

pub use fetcher::{fetch_all, FetchError};
pub use session::{Credentials, LoginError, Session};

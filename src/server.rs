//! Read-only HTTP server over the archive store
//!
//! Answers the one query shape the fetcher mirrors, and nothing else. A
//! request is served only if it is a `GET` whose parameters match the
//! required literal set exactly; the blob for the supplied resume token (or
//! the first page) is returned byte-for-byte. Every other request (wrong
//! method, wrong shape, unknown token) gets `404` with an empty body. The
//! store is treated as immutable for the server's lifetime, so handlers
//! share it without locking.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::cache::{derive_key, ArchiveStore, FIRST_PAGE_KEY};
use crate::query;

/// Builds the router serving the archive
///
/// A single fallback handler answers every path, mirroring the original API
/// endpoint's behavior of dispatching on query parameters alone.
pub fn router(store: Arc<ArchiveStore>) -> Router {
    Router::new().fallback(handle).with_state(store)
}

/// Binds `0.0.0.0:<port>` and serves the archive until the process exits
pub async fn serve(store: ArchiveStore, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, dir = %store.dir().display(), "serving archive");
    axum::serve(listener, router(Arc::new(store))).await
}

async fn handle(State(store): State<Arc<ArchiveStore>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }

    // An unparseable query string is just another shape mismatch.
    let params = match Query::<HashMap<String, String>>::try_from_uri(&uri) {
        Ok(Query(params)) => params,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    let token = match query::validate(&params) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(%err, query = ?params, "rejected request");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let key = match token {
        Some(token) => derive_key(&token),
        None => FIRST_PAGE_KEY.to_string(),
    };

    match store.read_key(&key) {
        Some(bytes) => {
            ([(header::CONTENT_TYPE, "application/json")], bytes).into_response()
        }
        None => {
            tracing::info!(%key, "cache miss");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

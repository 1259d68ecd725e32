//! Pagination walk over the `alldeletedrevisions` listing
//!
//! Drives the remote listing front-to-back: request a page, write its raw
//! bytes under the key of the token that requested it, then adopt the
//! response's continuation block (if any) and loop. A page is always on disk
//! before the next request goes out, so a crash loses at most the in-flight
//! page and a resumed run never skips a written one.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::cache::ArchiveStore;
use crate::query::{self, Continuation};

use super::Session;

/// Errors that abort a pagination walk
///
/// Transport and status errors carry the token needed to resume the walk;
/// `None` means the walk failed on its very first page and should simply be
/// restarted from the beginning.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        source: reqwest::Error,
        resume: Option<String>,
    },

    /// Remote answered with a non-success status
    #[error("Remote returned HTTP {status}")]
    BadStatus {
        status: StatusCode,
        resume: Option<String>,
    },

    /// Page body was not the JSON document the listing promises
    #[error("Failed to parse page body: {source}")]
    ParseError {
        source: serde_json::Error,
        resume: Option<String>,
    },

    /// Writing a blob failed; filesystem errors are fatal
    #[error("Failed to write page blob: {0}")]
    WriteFailed(#[from] std::io::Error),
}

impl FetchError {
    /// The `adrcontinue` token an operator should pass to `--resume`
    pub fn resume_token(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { resume, .. }
            | Self::BadStatus { resume, .. }
            | Self::ParseError { resume, .. } => resume.as_deref(),
            Self::WriteFailed(_) => None,
        }
    }
}

/// The only part of a page the fetcher interprets: the continuation block.
/// Everything else is opaque bytes stored verbatim.
#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(rename = "continue")]
    continuation: Option<ContinueBlock>,
}

#[derive(Debug, Deserialize)]
struct ContinueBlock {
    #[serde(rename = "continue")]
    marker: String,
    adrcontinue: String,
}

/// Walks the listing from `resume` (or the first page) to the end
///
/// Persists every page into `store` and returns the number of pages written.
/// Any transport failure aborts immediately with the last-known resume token;
/// there is no automatic retry. A response without a `continue` block is the
/// normal termination signal.
pub async fn fetch_all(
    session: &Session,
    store: &ArchiveStore,
    resume: Option<String>,
) -> Result<usize, FetchError> {
    store.ensure_dir()?;

    let mut state: Option<Continuation> = resume.map(Continuation::resume_from);
    let mut pages = 0usize;

    loop {
        // The token used as input for this request names the blob,
        // never a token found inside the response. It is also what an
        // operator needs to retry this page after an abort.
        let resume = state.as_ref().map(|cont| cont.adrcontinue.clone());
        let request_token = resume.clone().unwrap_or_default();

        let response = session
            .client()
            .get(session.api_url())
            .query(&query::listing_params(state.as_ref()))
            .send()
            .await
            .map_err(|source| FetchError::RequestFailed {
                source,
                resume: resume.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus { status, resume });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::RequestFailed {
                source,
                resume: resume.clone(),
            })?;

        store.write_page(&request_token, &body)?;
        pages += 1;

        let envelope: PageEnvelope =
            serde_json::from_slice(&body).map_err(|source| FetchError::ParseError {
                source,
                resume: resume.clone(),
            })?;

        match envelope.continuation {
            Some(block) => {
                tracing::info!(adrcontinue = %block.adrcontinue, pages, "continuing walk");
                state = Some(Continuation {
                    marker: block.marker,
                    adrcontinue: block.adrcontinue,
                });
            }
            None => break,
        }
    }

    tracing::info!(pages, "walk complete");
    Ok(pages)
}

//! Shared query shape for the `alldeletedrevisions` listing
//!
//! The fetcher builds its outgoing requests and the cache server validates
//! incoming ones against the same fixed parameter set defined here. Keeping
//! both sides on one table is what makes a replayed fetcher URL a cache hit.

use std::collections::HashMap;
use thiserror::Error;

/// Revision properties requested for every page, order-sensitive.
pub const PROPERTIES: &str =
    "ids|flags|timestamp|user|userid|comment|content|tags|contentmodel|size|sha1";

/// Every namespace the wiki exposes, so unused ones cannot break a later import.
pub const NAMESPACES: &str =
    "0|1|2|3|4|5|6|7|8|9|10|11|12|13|14|15|274|275|710|711|828|829|2300|2301|2302|2303";

/// Bootstrap value for the top-level `continue` parameter when resuming a
/// walk from an operator-supplied token.
pub const CONTINUE_BOOTSTRAP: &str = "-||";

/// Parameters the cache server requires, each with its exact literal value.
///
/// Anything missing or different means the request is not the query this
/// mirror was built for, and the server answers 404.
pub const REQUIRED_PARAMS: [(&str, &str); 6] = [
    ("action", "query"),
    ("list", "alldeletedrevisions"),
    ("adrdir", "newer"),
    ("adrprop", PROPERTIES),
    ("format", "json"),
    ("formatversion", "2"),
];

/// Pagination state carried between requests
///
/// MediaWiki continuation requires the top-level `continue` marker and the
/// list-specific `adrcontinue` token to travel together; neither is valid
/// alone, so they share one struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    /// Top-level `continue` marker echoed from the previous response
    pub marker: String,
    /// Opaque resume token for the `alldeletedrevisions` listing
    pub adrcontinue: String,
}

impl Continuation {
    /// Seeds pagination state from an operator-supplied resume token,
    /// as if a previous run had just printed it.
    pub fn resume_from(token: impl Into<String>) -> Self {
        Self {
            marker: CONTINUE_BOOTSTRAP.to_string(),
            adrcontinue: token.into(),
        }
    }
}

/// A request that does not match the required query shape
#[derive(Debug, Error)]
#[error("query shape mismatch on parameters: {0:?}")]
pub struct QueryShapeError(pub Vec<&'static str>);

/// Builds the full outgoing parameter list for one listing request
///
/// The first request carries no continuation parameters; subsequent requests
/// (and resumed walks) append both continuation fields.
pub fn listing_params(continuation: Option<&Continuation>) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = REQUIRED_PARAMS
        .iter()
        .map(|(k, v)| (*k, (*v).to_string()))
        .collect();
    params.push(("adrnamespace", NAMESPACES.to_string()));
    params.push(("adrslots", "main".to_string()));
    params.push(("adrlimit", "max".to_string()));

    if let Some(cont) = continuation {
        params.push(("continue", cont.marker.clone()));
        params.push(("adrcontinue", cont.adrcontinue.clone()));
    }

    params
}

/// Validates an incoming query against the required parameter set
///
/// Every required parameter must be present and exactly equal to its literal
/// value. Extra parameters are ignored so a replayed fetcher URL (which also
/// carries `adrnamespace`, `adrslots` and `adrlimit`) still validates.
///
/// # Returns
/// * `Ok(Some(token))` if the shape matches and a resume token was supplied
/// * `Ok(None)` if the shape matches and the query asks for the first page
/// * `Err(QueryShapeError)` naming every missing or mismatched parameter
pub fn validate(params: &HashMap<String, String>) -> Result<Option<String>, QueryShapeError> {
    let offending: Vec<&'static str> = REQUIRED_PARAMS
        .iter()
        .filter(|(key, expected)| params.get(*key).map(String::as_str) != Some(*expected))
        .map(|(key, _)| *key)
        .collect();

    if !offending.is_empty() {
        return Err(QueryShapeError(offending));
    }

    Ok(params.get("adrcontinue").cloned())
}

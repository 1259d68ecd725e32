//! MediaWiki login session
//!
//! Performs the two-step login handshake (token retrieval, then a credentialed
//! login POST) and hands back a `Session` owning the cookie-carrying HTTP
//! client used for the rest of the run. The session is an explicit object
//! passed into each fetch step; nothing here is global.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Bot password credentials, obtained via Special:BotPasswords
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Bot account name (`lgname`)
    pub name: String,
    /// Bot password (`lgpassword`)
    pub password: String,
}

/// Errors that can occur during the login handshake
#[derive(Debug, Error)]
pub enum LoginError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// An authenticated session against one wiki's `api.php`
///
/// Owns the HTTP client (with cookie store) shared by every request of a
/// fetcher run. Login cookies set during the handshake are what authorize
/// the deleted-revision listing.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    query: TokenQuery,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    tokens: Tokens,
}

#[derive(Debug, Deserialize)]
struct Tokens {
    logintoken: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    login: Option<LoginOutcome>,
}

#[derive(Debug, Deserialize)]
struct LoginOutcome {
    result: String,
}

impl Session {
    /// Logs in against `api_url` and returns a ready session
    ///
    /// Step 1 fetches a login token; step 2 posts the credentials with that
    /// token. Transport failures at either step are fatal and not retried.
    /// A non-`Success` login result is logged but does not abort: wikis that
    /// expose deleted revisions publicly work without credentials.
    pub async fn login(api_url: impl Into<String>, credentials: &Credentials) -> Result<Self, LoginError> {
        let api_url = api_url.into();
        let client = Client::builder().cookie_store(true).build()?;

        let token_params = [
            ("action", "query"),
            ("meta", "tokens"),
            ("type", "login"),
            ("format", "json"),
        ];
        let text = client
            .get(&api_url)
            .query(&token_params)
            .send()
            .await?
            .text()
            .await?;
        let token_response: TokenResponse = serde_json::from_str(&text)?;
        let login_token = token_response.query.tokens.logintoken;

        let login_form = [
            ("action", "login"),
            ("lgname", credentials.name.as_str()),
            ("lgpassword", credentials.password.as_str()),
            ("lgtoken", login_token.as_str()),
            ("format", "json"),
        ];
        let text = client
            .post(&api_url)
            .form(&login_form)
            .send()
            .await?
            .text()
            .await?;
        let login_response: LoginResponse = serde_json::from_str(&text)?;

        match login_response.login {
            Some(outcome) if outcome.result == "Success" => {
                tracing::info!(lgname = %credentials.name, "logged in");
            }
            Some(outcome) => {
                tracing::warn!(result = %outcome.result, "login did not succeed; continuing unauthenticated");
            }
            None => {
                tracing::warn!("login response carried no result; continuing unauthenticated");
            }
        }

        Ok(Self { client, api_url })
    }

    /// The HTTP client shared across the session
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The wiki's `api.php` endpoint URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

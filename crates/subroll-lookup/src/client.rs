//! HTTP client for the IVR Twitch user endpoint.
//!
//! `GET {base_url}/v2/twitch/user?login=<login>` answers with a JSON array of
//! user objects; the first element's `displayName` is what we want.

use crate::error::LookupError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use subroll_core::config::LookupConfig;
use subroll_core::resolver::DisplayNameResolver;

const USER_PATH: &str = "/v2/twitch/user";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct IvrUser {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Display-name client for `api.ivr.fi` (or any server speaking its shape).
#[derive(Debug, Clone)]
pub struct IvrClient {
    http: reqwest::Client,
    base_url: String,
}

impl IvrClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the display name for `login`.
    ///
    /// `Ok(None)` means the API answered but knows no display name; non-2xx
    /// answers are [`LookupError::Status`].
    pub async fn fetch_display_name(&self, login: &str) -> Result<Option<String>, LookupError> {
        let url = format!("{}{}", self.base_url, USER_PATH);
        let response = self.http.get(&url).query(&[("login", login)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_display_name(&body)
    }
}

#[async_trait]
impl DisplayNameResolver for IvrClient {
    async fn resolve(&self, login: &str) -> Option<String> {
        match self.fetch_display_name(login).await {
            Ok(name) => {
                tracing::debug!(login, found = name.is_some(), "ivr: lookup complete");
                name
            }
            Err(LookupError::Status(404)) => {
                tracing::debug!(login, "ivr: login not found");
                None
            }
            Err(err) => {
                tracing::warn!(login, error = %err, "ivr: lookup failed");
                None
            }
        }
    }
}

/// Pull `[0].displayName` out of an IVR response body. An empty array or an
/// empty display name both mean "none".
fn parse_display_name(body: &str) -> Result<Option<String>, LookupError> {
    let users: Vec<IvrUser> = serde_json::from_str(body)?;
    Ok(users
        .into_iter()
        .next()
        .and_then(|user| user.display_name)
        .filter(|name| !name.is_empty()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

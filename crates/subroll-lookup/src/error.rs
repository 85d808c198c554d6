//! Errors raised while talking to the display-name API.

/// A failed display-name request.
///
/// These never reach the user directly: the resolver impl logs them and
/// reports "no display name".
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

//! Boot client errors

use thiserror::Error;

/// Errors that can occur when calling the boot server API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configuration lists no endpoints
    #[error("no endpoints configured")]
    NoEndpoints,

    /// An endpoint is not of the form `host:port`
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        endpoint: String,
        reason: &'static str,
    },

    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server reported a missing entity or an unmatched request
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request
    #[error("Boot server API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the error reports a missing entity or unmatched request.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

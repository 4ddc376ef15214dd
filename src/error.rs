//! Unified error types for the relay.

use thiserror::Error;

/// Unified error type for the relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// LINE Messaging API error.
    #[error("line api error: {0}")]
    LineApi(#[from] LineApiError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from calls to the LINE Messaging API.
#[derive(Error, Debug)]
pub enum LineApiError {
    /// Request never produced a response (connect, timeout, TLS).
    #[error("request to LINE API failed: {0}")]
    Request(#[from] reqwest::Error),

    /// LINE answered with a non-success status.
    #[error("LINE API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by LINE.
        body: String,
    },

    /// Channel access token cannot be used as a header value.
    #[error("invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl LineApiError {
    /// HTTP status returned by LINE, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidHeader(_) => None,
        }
    }
}

/// Errors decoding a webhook request body or one of its events.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Body or event is not the JSON shape LINE sends.
    #[error("invalid webhook json: {0}")]
    Json(#[from] serde_json::Error),

    /// Event is missing a field its type requires.
    #[error("{kind} event is missing {field}")]
    MissingField {
        /// Event type.
        kind: String,
        /// Name of the missing field.
        field: &'static str,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, RelayError>;

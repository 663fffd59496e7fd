//! REST client error types.

use serde::Deserialize;
use thiserror::Error;

/// REST client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend rejected the bearer token. The session has been reset.
    #[error("unauthorized: session expired or invalid")]
    Unauthorized,

    /// Non-success response from the backend.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message, taken from the response body when it has one.
        message: String,
    },

    /// Transport failure (no response received).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Request data failed local validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ClientError {
    /// Whether this error ended the local session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Text suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Api { message, .. } | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for REST client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Items(Vec<ErrorItem>),
    Message(String),
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    msg: String,
}

/// Extracts the user-facing message from an error response body.
///
/// Understands `{"detail": [{"loc": [..], "msg": "..", "type": ".."}]}`
/// (first `msg` wins) and `{"detail": "..."}`.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        ErrorDetail::Items(items) => items.into_iter().next().map(|item| item.msg),
        ErrorDetail::Message(msg) => Some(msg),
    }
}

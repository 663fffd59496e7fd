//! CLI error types.

use mc_auth::AuthError;
use mc_client::ClientError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Not signed in, or the session was rejected.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Authentication flow error.
    #[error(transparent)]
    Flow(#[from] AuthError),

    /// REST client error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<mc_core::Error> for CliError {
    fn from(err: mc_core::Error) -> Self {
        match err {
            mc_core::Error::Config(msg) => Self::Config(msg),
            mc_core::Error::Io(e) => Self::Io(e),
        }
    }
}

impl CliError {
    /// Text shown to the user when the command fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Flow(e) => e.user_message(),
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

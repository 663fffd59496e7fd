//! Authentication error types.

use std::fmt;

use crate::provider::ProviderError;

/// Authentication operation errors.
///
/// None of these are fatal: each degrades to asking the user to retry or
/// sign in again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No identity provider is attached; the action is unavailable.
    ProviderUnavailable,
    /// Fetching a token from the provider failed.
    TokenFetch(String),
    /// The provider rejected the submitted credentials or code.
    CredentialRejected(String),
    /// The SSO callback did not complete in time.
    SsoTimeout,
    /// Submitted form data failed local validation.
    Validation(String),
}

impl AuthError {
    /// Builds a rejection from a provider error, falling back to `fallback`
    /// when the provider gave no message.
    #[must_use]
    pub fn rejected(err: &ProviderError, fallback: &str) -> Self {
        Self::CredentialRejected(err.message_or(fallback).to_string())
    }

    /// Text suitable for a user-facing notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderUnavailable => "Authentication service is not available".to_string(),
            Self::TokenFetch(msg) => format!("Could not refresh your session: {msg}"),
            Self::CredentialRejected(msg) | Self::Validation(msg) => msg.clone(),
            Self::SsoTimeout => "Authentication timed out. Please try signing in again.".to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderUnavailable => write!(f, "authentication service is not available"),
            Self::TokenFetch(msg) => write!(f, "token fetch failed: {msg}"),
            Self::CredentialRejected(msg) => write!(f, "credentials rejected: {msg}"),
            Self::SsoTimeout => write!(f, "SSO callback timed out"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

//! Identity provider boundary.
//!
//! The third-party identity SDK is consumed only through
//! [`IdentityProvider`]. Its observable state is published as
//! [`ProviderSnapshot`] values over a `tokio::sync::watch` channel, which
//! is what the sync bridge and SSO callback subscribe to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// User profile as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// Provider user id.
    pub id: String,
    /// Primary email address, if the user has one.
    pub primary_email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
}

impl ProviderUser {
    /// Creates a profile with only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary_email: None,
            first_name: None,
            last_name: None,
        }
    }

    /// Sets the primary email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.primary_email = Some(email.into());
        self
    }
}

/// Observable provider state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSnapshot {
    /// Whether the SDK has finished initializing.
    pub is_loaded: bool,
    /// Whether a session is active.
    pub is_signed_in: bool,
    /// Active user id.
    pub user_id: Option<String>,
    /// Active user profile. May lag behind `user_id` while loading.
    pub user: Option<ProviderUser>,
}

impl ProviderSnapshot {
    /// SDK still initializing.
    #[must_use]
    pub fn loading() -> Self {
        Self::default()
    }

    /// SDK loaded with no active session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            is_loaded: true,
            ..Self::default()
        }
    }

    /// SDK loaded with `user` signed in.
    #[must_use]
    pub fn signed_in(user: ProviderUser) -> Self {
        Self {
            is_loaded: true,
            is_signed_in: true,
            user_id: Some(user.id.clone()),
            user: Some(user),
        }
    }
}

/// Supported OAuth strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OAuthStrategy {
    /// Google.
    #[serde(rename = "oauth_google")]
    Google,
    /// GitHub.
    #[serde(rename = "oauth_github")]
    Github,
    /// Facebook.
    #[serde(rename = "oauth_facebook")]
    Facebook,
}

impl OAuthStrategy {
    /// Provider wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "oauth_google",
            Self::Github => "oauth_github",
            Self::Facebook => "oauth_facebook",
        }
    }
}

/// Password sign-in request.
#[derive(Clone, Serialize)]
pub struct SignInCredentials {
    /// Email or username.
    pub identifier: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Sign-up request.
#[derive(Clone, Serialize)]
pub struct SignUpRegistration {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email_address: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for SignUpRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRegistration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Status of a sign-in, sign-up or verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// A session was created.
    Complete,
    /// An identifier is still required.
    NeedsIdentifier,
    /// The first factor is still required.
    NeedsFirstFactor,
    /// A second factor (OTP) is required.
    NeedsSecondFactor,
    /// Required fields or verifications are missing.
    MissingRequirements,
    /// The attempt was abandoned.
    Abandoned,
}

/// Result of a sign-in, sign-up or verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Attempt status.
    pub status: AttemptStatus,
    /// Session created when `status` is [`AttemptStatus::Complete`].
    pub created_session_id: Option<String>,
}

impl AttemptResult {
    /// A completed attempt that created `session_id`.
    #[must_use]
    pub fn complete(session_id: impl Into<String>) -> Self {
        Self {
            status: AttemptStatus::Complete,
            created_session_id: Some(session_id.into()),
        }
    }

    /// An attempt still waiting on `status`.
    #[must_use]
    pub const fn pending(status: AttemptStatus) -> Self {
        Self {
            status,
            created_session_id: None,
        }
    }
}

/// Error reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("identity provider error"))]
pub struct ProviderError {
    /// Provider error code.
    pub code: Option<String>,
    /// Human-readable message from the provider.
    pub message: Option<String>,
}

impl ProviderError {
    /// Creates an error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
        }
    }

    /// Sets the provider error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The operation is not offered by this provider.
    #[must_use]
    pub fn unsupported(operation: &str) -> Self {
        Self::new(format!("{operation} is not supported by this identity provider"))
            .with_code("unsupported")
    }

    /// The provider's message, or `fallback`.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Third-party identity provider client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current provider state.
    fn snapshot(&self) -> ProviderSnapshot;

    /// Subscribes to provider state changes.
    fn subscribe(&self) -> watch::Receiver<ProviderSnapshot>;

    /// Fetches a bearer token for the active session.
    ///
    /// Returns `None` when there is no active session.
    async fn get_token(&self) -> ProviderResult<Option<String>>;

    /// Ends the active session.
    async fn sign_out(&self) -> ProviderResult<()>;

    /// Makes `session_id` the active session.
    async fn set_active(&self, session_id: &str) -> ProviderResult<()>;

    /// Starts an OAuth redirect round-trip.
    async fn authenticate_with_redirect(
        &self,
        strategy: OAuthStrategy,
        redirect_url: &str,
        redirect_url_complete: &str,
    ) -> ProviderResult<()>;

    /// Starts a password sign-in.
    async fn sign_in(&self, credentials: &SignInCredentials) -> ProviderResult<AttemptResult>;

    /// Registers a new user.
    async fn sign_up(&self, registration: &SignUpRegistration) -> ProviderResult<AttemptResult>;

    /// Submits a second-factor code for the pending sign-in.
    async fn attempt_second_factor(&self, code: &str) -> ProviderResult<AttemptResult>;

    /// Submits an email verification code for the pending sign-up.
    async fn attempt_email_verification(&self, code: &str) -> ProviderResult<AttemptResult>;

    /// Sends a second-factor code for the pending sign-in.
    async fn prepare_second_factor(&self) -> ProviderResult<()>;

    /// Sends an email verification code for the pending sign-up.
    async fn prepare_email_verification(&self) -> ProviderResult<()>;
}

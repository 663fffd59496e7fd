//! Identity provider backed by a pre-issued token.
//!
//! Used by the CLI, where the interactive browser flows of the real identity
//! provider are unavailable. The session is loaded and signed in from the
//! start when a token is configured; interactive operations are refused.

use async_trait::async_trait;
use mc_core::AuthConfig;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::provider::{
    AttemptResult, IdentityProvider, OAuthStrategy, ProviderError, ProviderResult,
    ProviderSnapshot, ProviderUser, SignInCredentials, SignUpRegistration,
};

/// Identity provider holding a fixed user and token.
#[derive(Debug)]
pub struct StaticTokenProvider {
    user: ProviderUser,
    token: RwLock<Option<String>>,
    state: watch::Sender<ProviderSnapshot>,
}

impl StaticTokenProvider {
    /// Creates a signed-in provider for `user` holding `token`.
    #[must_use]
    pub fn new(user: ProviderUser, token: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ProviderSnapshot::signed_in(user.clone()));
        Self {
            user,
            token: RwLock::new(Some(token.into())),
            state,
        }
    }

    /// Creates a loaded provider with no active session.
    #[must_use]
    pub fn signed_out() -> Self {
        let (state, _) = watch::channel(ProviderSnapshot::signed_out());
        Self {
            user: ProviderUser::new(""),
            token: RwLock::new(None),
            state,
        }
    }

    /// Builds a provider from configured credentials.
    ///
    /// Without a configured token the provider starts signed out.
    #[must_use]
    pub fn from_config(auth: Option<&AuthConfig>) -> Self {
        match auth {
            Some(AuthConfig {
                user_id,
                email,
                access_token: Some(token),
            }) => {
                let mut user = ProviderUser::new(user_id.clone());
                user.primary_email.clone_from(email);
                Self::new(user, token.clone())
            }
            _ => Self::signed_out(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    fn snapshot(&self) -> ProviderSnapshot {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ProviderSnapshot> {
        self.state.subscribe()
    }

    async fn get_token(&self) -> ProviderResult<Option<String>> {
        match self.token.read().as_deref() {
            Some(token) if token.trim().is_empty() => {
                Err(ProviderError::new("configured access token is empty").with_code("empty_token"))
            }
            token => Ok(token.map(str::to_string)),
        }
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        *self.token.write() = None;
        self.state.send_replace(ProviderSnapshot::signed_out());
        tracing::debug!(user_id = %self.user.id, "static session signed out");
        Ok(())
    }

    async fn set_active(&self, _session_id: &str) -> ProviderResult<()> {
        Err(ProviderError::unsupported("session activation"))
    }

    async fn authenticate_with_redirect(
        &self,
        strategy: OAuthStrategy,
        _redirect_url: &str,
        _redirect_url_complete: &str,
    ) -> ProviderResult<()> {
        Err(ProviderError::unsupported(strategy.as_str()))
    }

    async fn sign_in(&self, _credentials: &SignInCredentials) -> ProviderResult<AttemptResult> {
        Err(ProviderError::unsupported("password sign-in"))
    }

    async fn sign_up(&self, _registration: &SignUpRegistration) -> ProviderResult<AttemptResult> {
        Err(ProviderError::unsupported("sign-up"))
    }

    async fn attempt_second_factor(&self, _code: &str) -> ProviderResult<AttemptResult> {
        Err(ProviderError::unsupported("second factor verification"))
    }

    async fn attempt_email_verification(&self, _code: &str) -> ProviderResult<AttemptResult> {
        Err(ProviderError::unsupported("email verification"))
    }

    async fn prepare_second_factor(&self) -> ProviderResult<()> {
        Err(ProviderError::unsupported("second factor verification"))
    }

    async fn prepare_email_verification(&self) -> ProviderResult<()> {
        Err(ProviderError::unsupported("email verification"))
    }
}

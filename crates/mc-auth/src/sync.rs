//! Identity provider → session store synchronization.

use std::sync::Arc;
use std::time::Duration;

use mc_session::{SessionStore, SessionUser};
use tokio::sync::watch;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, ProviderSnapshot, ProviderUser};

/// Default lifetime of synced claims.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// What a single sync pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Provider not loaded, no user, or no token; store untouched.
    Skipped,
    /// Store already held this identity and token.
    Unchanged,
    /// Store was written.
    Synced,
    /// Token fetch failed; store untouched.
    Failed(AuthError),
}

/// The part of provider state a sync depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyncKey {
    is_loaded: bool,
    user_id: Option<String>,
    user: Option<ProviderUser>,
}

impl From<&ProviderSnapshot> for SyncKey {
    fn from(snapshot: &ProviderSnapshot) -> Self {
        Self {
            is_loaded: snapshot.is_loaded,
            user_id: snapshot.user_id.clone(),
            user: snapshot.user.clone(),
        }
    }
}

/// Keeps the session store consistent with the identity provider.
pub struct AuthSync {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<SessionStore>,
    token_lifetime: Duration,
}

impl AuthSync {
    /// Creates a bridge between `provider` and `store`.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<SessionStore>) -> Self {
        Self {
            provider,
            store,
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }

    /// Overrides the lifetime written into synced claims.
    #[must_use]
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Runs one sync pass against `snapshot`.
    ///
    /// Fetch failures are logged and leave the store as it was.
    pub async fn sync(&self, snapshot: &ProviderSnapshot) -> SyncOutcome {
        let (Some(user_id), Some(user)) = (&snapshot.user_id, &snapshot.user) else {
            return SyncOutcome::Skipped;
        };
        if !snapshot.is_loaded {
            return SyncOutcome::Skipped;
        }

        let token = match self.provider.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "identity provider returned no token");
                return SyncOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "error syncing identity provider session");
                return SyncOutcome::Failed(AuthError::TokenFetch(e.to_string()));
            }
        };

        let lifetime = chrono::Duration::from_std(self.token_lifetime)
            .unwrap_or_else(|_| chrono::Duration::hours(1));
        let claims = SessionUser::new(
            user_id.clone(),
            user.primary_email.clone().unwrap_or_default(),
            lifetime,
        );

        let current = self.store.snapshot();
        let same_token = current.access_token.as_deref() == Some(token.as_str());
        let same_user = current
            .user
            .as_ref()
            .is_some_and(|existing| existing.same_identity(&claims));
        if same_token && same_user {
            return SyncOutcome::Unchanged;
        }

        self.store.establish(claims, token);
        tracing::info!(user_id = %user_id, "session synced from identity provider");
        SyncOutcome::Synced
    }

    /// Syncs on the current provider state and again on every change to
    /// `(is_loaded, user_id, user)`.
    ///
    /// Returns when the provider's channel closes; otherwise runs until the
    /// surrounding task is aborted.
    pub async fn run(&self, mut state: watch::Receiver<ProviderSnapshot>) {
        let mut last: Option<SyncKey> = None;
        loop {
            let snapshot = state.borrow_and_update().clone();
            let key = SyncKey::from(&snapshot);
            if last.as_ref() != Some(&key) {
                self.sync(&snapshot).await;
                last = Some(key);
            }

            if state.changed().await.is_err() {
                tracing::debug!("identity provider closed, stopping session sync");
                return;
            }
        }
    }
}

//! Route guard for protected views.

use std::sync::Arc;

use mc_session::SessionStore;
use parking_lot::Mutex;

use crate::effects::{Navigator, Route};
use crate::provider::ProviderSnapshot;

/// Authentication readiness, derived on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Identity provider still loading.
    Initializing,
    /// Loaded but either signed out or not yet synced into the store.
    Unauthenticated,
    /// Signed in with an access token in the store.
    Authenticated,
}

impl GuardState {
    /// Derives the state from provider readiness and token presence.
    #[must_use]
    pub const fn derive(snapshot: &ProviderSnapshot, has_token: bool) -> Self {
        if !snapshot.is_loaded {
            Self::Initializing
        } else if snapshot.is_signed_in && has_token {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

/// What the protected view should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a loading indicator.
    Loading,
    /// Render nothing; a redirect to the route was just issued.
    Redirected(Route),
    /// Render nothing; the redirect was already issued earlier.
    Blocked,
    /// Render the protected content.
    Render,
}

impl GuardDecision {
    /// Whether protected content may be rendered.
    #[must_use]
    pub const fn renders(self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Gates protected views on provider readiness and the session token.
///
/// The sign-in redirect fires once per transition into
/// [`GuardState::Unauthenticated`]; repeated checks in that state do not
/// navigate again.
pub struct RouteGuard {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    last: Mutex<Option<GuardState>>,
}

impl RouteGuard {
    /// Creates a guard reading `store` and redirecting through `navigator`.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            last: Mutex::new(None),
        }
    }

    /// Evaluates the guard for a navigation.
    pub fn check(&self, snapshot: &ProviderSnapshot) -> GuardDecision {
        let state = GuardState::derive(snapshot, self.store.is_authenticated());
        let previous = self.last.lock().replace(state);

        match state {
            GuardState::Initializing => GuardDecision::Loading,
            GuardState::Authenticated => GuardDecision::Render,
            GuardState::Unauthenticated if previous == Some(GuardState::Unauthenticated) => {
                GuardDecision::Blocked
            }
            GuardState::Unauthenticated => {
                tracing::debug!(
                    signed_in = snapshot.is_signed_in,
                    "unauthenticated, redirecting to sign-in"
                );
                self.navigator.navigate(Route::SignIn);
                GuardDecision::Redirected(Route::SignIn)
            }
        }
    }

    /// State computed by the most recent check.
    #[must_use]
    pub fn state(&self) -> Option<GuardState> {
        *self.last.lock()
    }
}

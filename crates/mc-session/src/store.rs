//! Process-wide session store.

use std::fmt;

use parking_lot::RwLock;

use crate::claims::SessionUser;

/// Point-in-time copy of the store contents.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Signed-in user claims.
    pub user: Option<SessionUser>,
    /// Bearer token for the REST API.
    pub access_token: Option<String>,
}

impl SessionSnapshot {
    /// Whether nothing is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user.is_none() && self.access_token.is_none()
    }
}

impl fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("user", &self.user)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Holder of the current authenticated identity and token.
///
/// Shared as `Arc<SessionStore>`. Writers replace whole fields under a
/// single lock, so readers never observe a token without the claims it
/// was issued with when [`SessionStore::establish`] is used.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<SessionSnapshot>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signed-in user claims.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.inner.read().user.clone()
    }

    /// Replaces the user claims.
    pub fn set_user(&self, user: SessionUser) {
        self.inner.write().user = Some(user);
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.read().access_token.clone()
    }

    /// Replaces the bearer token.
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.inner.write().access_token = Some(token.into());
    }

    /// Writes claims and token together.
    pub fn establish(&self, user: SessionUser, token: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.user = Some(user);
        inner.access_token = Some(token.into());
    }

    /// Clears all session state.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        if !inner.is_empty() {
            tracing::debug!("session store reset");
        }
        *inner = SessionSnapshot::default();
    }

    /// Whether a bearer token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().access_token.is_some()
    }

    /// Copies the current contents.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().clone()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.read())
            .finish()
    }
}

//! Identity claims held for the signed-in user.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to every synced user.
pub const DEFAULT_ROLE: &str = "user";

/// The signed-in user as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Identity provider user id.
    pub account_no: String,
    /// Primary email address, empty when the provider has none.
    pub email: String,
    /// Granted roles.
    pub roles: BTreeSet<String>,
    /// When these claims stop being trusted.
    pub expires_at: DateTime<Utc>,
}

impl SessionUser {
    /// Creates claims with the default role, valid for `lifetime` from now.
    #[must_use]
    pub fn new(account_no: impl Into<String>, email: impl Into<String>, lifetime: Duration) -> Self {
        let mut roles = BTreeSet::new();
        roles.insert(DEFAULT_ROLE.to_string());
        Self {
            account_no: account_no.into(),
            email: email.into(),
            roles,
            expires_at: Utc::now() + lifetime,
        }
    }

    /// Checks if the claims have expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Avatar initials: the first letter of the email, uppercased.
    #[must_use]
    pub fn initials(&self) -> String {
        self.email
            .chars()
            .next()
            .map_or_else(|| "U".to_string(), |c| c.to_uppercase().collect())
    }

    /// Whether these claims describe the same identity as `other`.
    ///
    /// Expiry is ignored.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.account_no == other.account_no && self.email == other.email && self.roles == other.roles
    }
}

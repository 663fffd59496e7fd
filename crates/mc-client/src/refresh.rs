//! Combined refresh of account data and token status.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::accounts::MassChatAccount;
use crate::client::{ApiClient, TokenStatus};
use crate::error::ClientResult;

/// Accounts and token status fetched in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DataSnapshot {
    /// All accounts.
    pub accounts: Vec<MassChatAccount>,
    /// Backend view of the current token.
    pub token_status: TokenStatus,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

impl ApiClient {
    /// Refetches accounts and token status concurrently.
    ///
    /// Fails with the first error; a 401 from either request resets the
    /// session as usual.
    pub async fn refresh(&self) -> ClientResult<DataSnapshot> {
        let accounts = self.accounts();
        let (accounts, token_status) =
            futures::try_join!(accounts.list(), self.check_token_status())?;
        tracing::info!(accounts = accounts.len(), "data refreshed");

        Ok(DataSnapshot {
            accounts,
            token_status,
            fetched_at: Utc::now(),
        })
    }
}

//! # mc-client
//!
//! REST client for the MassChat backend.
//!
//! [`ApiClient`] reads the bearer token from the shared
//! [`SessionStore`](mc_session::SessionStore) on every request. A 401 from
//! any endpoint resets the store before the error is returned, so the
//! route guard sends the user back to sign-in on its next check.
//!
//! Resources:
//! - [`Accounts`]: list, fetch and create messaging accounts
//! - [`ApiClient::check_token_status`]: backend view of the current token
//! - [`ApiClient::refresh`]: accounts and token status fetched together

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod accounts;
pub mod client;
pub mod error;
pub mod refresh;

pub use accounts::{Accounts, MassChatAccount, NewAccount};
pub use client::{ApiClient, TokenStatus};
pub use error::{ClientError, ClientResult};
pub use refresh::DataSnapshot;

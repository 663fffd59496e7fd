//! # mc-core
//!
//! Configuration and shared error handling for the MassChat admin client.
//!
//! Every other `mc-*` crate reads its settings from [`Config`]: the REST
//! base URL, the application origin used for OAuth redirects, session
//! token lifetime and the SSO callback timers.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;

pub use config::{AuthConfig, Config, SessionConfig, SsoConfig};
pub use error::{Error, Result};

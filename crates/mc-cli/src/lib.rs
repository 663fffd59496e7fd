//! # mc-cli
//!
//! Command-line administration for MassChat.
//!
//! This crate provides:
//! - Account management (list, get, create)
//! - Token status checks and combined data refresh with JSON export
//! - Session inspection, SSO confirmation and sign-out
//! - Configuration management (show, set, init)
//!
//! Every API command first syncs the identity provider into the session
//! store and passes the route guard.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use context::AppContext;
pub use error::{CliError, CliResult};

//! Command implementations.

pub mod accounts;
pub mod config;
pub mod data;
pub mod session;

pub use accounts::run_accounts;
pub use config::run_config;
pub use data::{run_sync, run_token_status};
pub use session::{run_login, run_logout, run_session};

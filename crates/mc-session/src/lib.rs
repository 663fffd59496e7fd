//! # mc-session
//!
//! Client-side session state for the MassChat admin client.
//!
//! The [`SessionStore`] holds the signed-in user's claims and bearer token
//! for the lifetime of the process. It is written by the auth sync bridge,
//! read by the route guard and the REST client, and reset on sign-out or
//! on any 401 from the API.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claims;
pub mod store;

pub use claims::{SessionUser, DEFAULT_ROLE};
pub use store::{SessionSnapshot, SessionStore};

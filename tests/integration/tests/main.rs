//! End-to-end integration tests.
//!
//! These tests wire the session store, sync bridge, route guard, SSO
//! callback and REST client together against a scripted identity provider
//! and a wiremock backend.

mod accounts_api;
mod auth_flows;
mod session_lifecycle;
mod sso_callback;

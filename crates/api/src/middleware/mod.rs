//! Request-level authentication and throttling.
//!
//! - [`auth::AuthUser`] -- Resolves the bearer access token to an active user.
//! - [`rate_limit::rate_limit`] -- Fixed-window per-user / per-IP request budgets.

pub mod auth;
pub mod rate_limit;

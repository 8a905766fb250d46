//! Environment-driven server configuration.

use std::fmt::Display;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;
use crate::middleware::rate_limit::RateLimitConfig;

/// Read `key` from the environment, falling back to `default`.
///
/// Panics at startup when the value does not parse as `T`.
pub(crate) fn env_or<T>(key: &str, default: impl Display) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}"))
}

/// Everything the HTTP server needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to make credentialed cross-site requests.
    pub cors_origins: Vec<String>,
    /// Requests running longer than this are answered with 408.
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `8000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    ///
    /// Token and throttling settings come from [`JwtConfig::from_env`] and
    /// [`RateLimitConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", 8000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: byeolpedia_db::DbPool,
    /// Server configuration (JWT secret, rate-limit budgets).
    pub config: Arc<ServerConfig>,
    /// Request counters for the current rate-limit windows.
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(pool: byeolpedia_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }
}

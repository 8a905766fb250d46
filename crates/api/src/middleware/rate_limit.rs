//! Fixed-window request throttling.
//!
//! Callers presenting a valid access token are counted per user id; everyone
//! else is counted per client IP. Counters live in process memory and reset
//! at the end of each one-hour window.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;

use crate::auth::jwt::{validate_token, TokenType};
use crate::config::env_or;
use crate::error::AppError;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

/// Length of one counting window.
pub const WINDOW: Duration = Duration::from_secs(60 * 60);

/// Expired windows are swept once the table grows past this many keys.
const PRUNE_THRESHOLD: usize = 10_000;

/// Per-window request budgets.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per hour for anonymous callers, per client IP (default: 100).
    pub anon_per_hour: u32,
    /// Requests per hour for authenticated callers, per user (default: 1000).
    pub user_per_hour: u32,
}

impl RateLimitConfig {
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `RATE_LIMIT_ANON_PER_HOUR` | `100`   |
    /// | `RATE_LIMIT_USER_PER_HOUR` | `1000`  |
    pub fn from_env() -> Self {
        Self {
            anon_per_hour: env_or("RATE_LIMIT_ANON_PER_HOUR", 100),
            user_per_hour: env_or("RATE_LIMIT_USER_PER_HOUR", 1000),
        }
    }
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Request counters keyed by caller.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_window(WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            window,
        }
    }

    /// Count one request for `key` against `limit`.
    pub fn check(&self, key: &str, limit: u32) -> Decision {
        if self.windows.len() > PRUNE_THRESHOLD {
            self.prune(Instant::now());
        }
        self.check_at(key, limit, Instant::now())
    }

    fn check_at(&self, key: &str, limit: u32, now: Instant) -> Decision {
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= limit {
            let remaining = self.window.saturating_sub(now.duration_since(entry.started));
            return Decision::Limited {
                retry_after_secs: remaining.as_millis().div_ceil(1000).max(1) as u64,
            };
        }

        entry.count += 1;
        Decision::Allowed
    }

    /// Drop every window that has already ended.
    fn prune(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }
}

/// Middleware that rejects callers over budget with 429 and `Retry-After`.
///
/// Mount with `axum::middleware::from_fn_with_state`. The client IP comes
/// from `ConnectInfo`, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limits = &state.config.rate_limit;

    let user_id = bearer_token(request.headers())
        .and_then(|token| validate_token(token, TokenType::Access, &state.config.jwt).ok())
        .map(|claims| claims.sub);

    let (key, limit) = match user_id {
        Some(id) => (format!("user:{id}"), limits.user_per_hour),
        None => {
            let ip = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".into());
            (format!("ip:{ip}"), limits.anon_per_hour)
        }
    };

    match state.rate_limiter.check(&key, limit) {
        Decision::Allowed => Ok(next.run(request).await),
        Decision::Limited { retry_after_secs } => {
            tracing::warn!(key = %key, retry_after_secs, "Rate limit exceeded");
            Err(AppError::TooManyRequests { retry_after_secs })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..3 {
            assert_eq!(limiter.check_at("ip:1.2.3.4", 3, now), Decision::Allowed);
        }
        assert_matches!(
            limiter.check_at("ip:1.2.3.4", 3, now),
            Decision::Limited { retry_after_secs: 3600 }
        );
    }

    #[test]
    fn keys_are_counted_separately() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        assert_eq!(limiter.check_at("user:a", 1, now), Decision::Allowed);
        assert_eq!(limiter.check_at("user:b", 1, now), Decision::Allowed);
        assert_matches!(limiter.check_at("user:a", 1, now), Decision::Limited { .. });
    }

    #[test]
    fn retry_after_counts_down_and_window_resets() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        assert_eq!(limiter.check_at("ip:x", 1, start), Decision::Allowed);

        let later = start + Duration::from_secs(1000);
        assert_eq!(
            limiter.check_at("ip:x", 1, later),
            Decision::Limited {
                retry_after_secs: 2600
            }
        );

        assert_eq!(limiter.check_at("ip:x", 1, start + WINDOW), Decision::Allowed);
    }

    #[test]
    fn prune_drops_expired_windows() {
        let limiter = RateLimiter::with_window(Duration::from_secs(10));
        let start = Instant::now();
        limiter.check_at("old", 5, start);
        limiter.check_at("fresh", 5, start + Duration::from_secs(8));

        limiter.prune(start + Duration::from_secs(12));
        assert!(!limiter.windows.contains_key("old"));
        assert!(limiter.windows.contains_key("fresh"));
    }
}

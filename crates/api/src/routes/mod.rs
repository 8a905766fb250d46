pub mod auth;
pub mod catalog;
pub mod collection;

use axum::routing::get;
use axum::Router;

use crate::handlers::index;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/...          account lifecycle, profile, stats
/// /catalog/...       public read-only catalog
/// /collection/...    per-user collection, wishlist, favorites, stats
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/catalog", catalog::router())
        .nest("/collection", collection::router())
}

/// Root-level routes, outside `/api` and exempt from rate limiting.
///
/// ```text
/// GET /        API index
/// GET /health  liveness and database health
/// ```
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(index::health))
}

//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{account, auth};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST  /register/        -> register
/// POST  /login/           -> login
/// POST  /logout/          -> logout (requires auth)
/// POST  /token/refresh/   -> refresh
/// GET   /profile/         -> get_profile (requires auth)
/// PATCH /profile/         -> update_profile (requires auth)
/// GET   /stats/           -> collection_stats (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .route("/logout/", post(auth::logout))
        .route("/token/refresh/", post(auth::refresh))
        .route(
            "/profile/",
            get(account::get_profile).patch(account::update_profile),
        )
        .route("/stats/", get(account::collection_stats))
}

//! The application [`Router`] with its full middleware stack.
//!
//! `main.rs` and the integration tests both build the app through
//! [`build_app_router`], so tests exercise the same layers as production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::rate_limit;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Assemble root routes, the rate-limited `/api` tree and the shared layers.
///
/// Layers run outermost first: CORS, request id assignment, tracing, request
/// id echo, timeout (408), then panic recovery (500).
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let api = routes::api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit,
    ));

    // Router::layer wraps outward: the last layer added sees a request first.
    routes::root_routes()
        .nest("/api", api)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// CORS for the configured frontend origins.
///
/// # Panics
///
/// Panics when an origin is not a valid header value.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config.cors_origins.iter().map(|origin| {
        HeaderValue::from_str(origin)
            .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
    });

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

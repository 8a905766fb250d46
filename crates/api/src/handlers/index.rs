//! Root endpoints: the API index at `/` and the health probe at `/health`.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub auth: &'static str,
    pub catalog: &'static str,
    pub collection: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Welcome to the Byeolpedia API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            auth: "/api/auth/",
            catalog: "/api/catalog/",
            collection: "/api/collection/",
            health: "/health",
        },
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Answers 200 even when the database is down; `db_healthy` reports it.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match byeolpedia_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

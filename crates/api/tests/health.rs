//! Integration tests for the health check endpoint and general HTTP behaviour:
//! request ids, CORS, the API index and rate limiting.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, get_auth};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

// ---------------------------------------------------------------------------
// Test: GET / lists the top-level endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn index_lists_endpoints(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["endpoints"]["catalog"], "/api/catalog/");
    assert_eq!(json["endpoints"]["health"], "/health");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a valid UUID (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_returns_correct_headers(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/collection/collectibles/")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "PATCH")
        .header("Access-Control-Request-Headers", "authorization")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"].to_str().unwrap(),
        "http://localhost:3000"
    );
    let allow_methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(
        allow_methods.contains("PATCH"),
        "Allow-Methods should contain PATCH, got: {allow_methods}"
    );
}

// ---------------------------------------------------------------------------
// Test: rate limiting
// ---------------------------------------------------------------------------

/// Anonymous callers share a per-IP budget; `/health` is not counted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_requests_are_throttled(pool: PgPool) {
    let mut config = common::test_config();
    config.rate_limit.anon_per_hour = 2;
    let app = common::build_app_with_config(pool, config);

    for _ in 0..2 {
        let response = get(app.clone(), "/api/catalog/groups/").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(app.clone(), "/api/catalog/groups/").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()["retry-after"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 3600);
    assert_eq!(body_json(response).await["code"], "RATE_LIMITED");

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Authenticated callers are counted per user, separately from their IP.
#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticated_requests_use_user_budget(pool: PgPool) {
    let mut config = common::test_config();
    config.rate_limit.anon_per_hour = 1;
    config.rate_limit.user_per_hour = 3;
    let app = common::build_app_with_config(pool, config);

    // Registration spends the single anonymous request.
    let token = common::access_token(app.clone(), "heavyuser").await;
    let response = get(app.clone(), "/api/catalog/groups/").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    for _ in 0..3 {
        let response = get_auth(app.clone(), "/api/catalog/groups/", &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = get_auth(app, "/api/catalog/groups/", &token).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

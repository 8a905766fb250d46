//! Tests for `AppError` → HTTP response mapping, plus the extractor
//! rejections that feed into it.
//!
//! The first group calls `IntoResponse` directly on `AppError` values; the
//! second sends malformed requests through the full router.

mod common;

use axum::body::Body;
use axum::http::header::RETRY_AFTER;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use byeolpedia_api::error::{AppError, FieldErrors};
use byeolpedia_core::error::CoreError;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use validator::Validate;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = uuid::Uuid::nil();
    let err = AppError::Core(CoreError::NotFound {
        entity: "Group",
        id,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Group with id {id} not found"));
    assert!(json.get("fields").is_none());
}

// ---------------------------------------------------------------------------
// Test: CoreError::Conflict maps to 400 with CONFLICT code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflict_error_returns_400() {
    let err = AppError::Core(CoreError::Conflict("duplicate name".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "duplicate name");
}

// ---------------------------------------------------------------------------
// Test: field errors are reported under `fields`
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_field_reports_the_field() {
    let err = AppError::from(CoreError::invalid_field("photocard", "Required"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["photocard"][0], "Required");
}

#[tokio::test]
async fn invalid_fields_keep_every_message() {
    let fields = FieldErrors::from([(
        "password".to_string(),
        vec!["Too short.".to_string(), "Too common.".to_string()],
    )]);

    let (status, json) = error_to_response(AppError::InvalidFields(fields)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["fields"]["password"].as_array().unwrap().len(), 2);
}

#[derive(Validate)]
struct Input {
    #[validate(email(message = "Enter a valid email address."))]
    email: String,
    #[validate(length(min = 1))]
    name: String,
}

#[tokio::test]
async fn validator_errors_fall_back_to_code() {
    let input = Input {
        email: "not-an-email".into(),
        name: String::new(),
    };
    let err = input.validate().unwrap_err();

    let (status, json) = error_to_response(AppError::from(err)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["fields"]["email"][0], "Enter a valid email address.");
    assert_eq!(json["fields"]["name"][0], "Invalid value (length)");
}

// ---------------------------------------------------------------------------
// Test: other status mappings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_and_forbidden() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("not yours".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn invalid_page_is_not_found() {
    let (status, json) = error_to_response(AppError::Core(CoreError::PageNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Invalid page");
}

#[tokio::test]
async fn throttled_response_carries_retry_after() {
    let response = AppError::TooManyRequests {
        retry_after_secs: 42,
    }
    .into_response();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[RETRY_AFTER], "42");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret detail".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (_, json) = error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: extractor rejections through the router
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login/")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_content_type_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login/")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_and_malformed_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app.clone(), "/api/auth/profile/").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        common::body_json(response).await["error"],
        "Authentication credentials were not provided"
    );

    let request = Request::builder()
        .uri("/api/auth/profile/")
        .header("Authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::get_auth(app, "/api/auth/profile/", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

//! HTTP-level integration tests for the account lifecycle: registration,
//! login, token refresh, logout, profile and statistics.

mod common;

use axum::http::StatusCode;
use byeolpedia_core::types::DbId;
use byeolpedia_db::repositories::UserRepo;
use common::{
    body_json, get, get_auth, patch_json_auth, post_json, post_json_auth, register, PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn register_body(username: &str, email: &str, password: &str, confirm: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "collector_name": "Midzy",
        "password": password,
        "password_confirm": confirm,
    })
}

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/auth/login/",
        json!({ "email": email, "password": password }),
    )
    .await
}

fn user_id(body: &serde_json::Value) -> DbId {
    body["user"]["id"].as_str().unwrap().parse().unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration creates the account, normalises the email and signs it in.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_returns_user_and_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = register_body("yeji", "Yeji@ITZY.test", PASSWORD, PASSWORD);

    let response = post_json(app, "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "yeji");
    assert_eq!(json["user"]["email"], "yeji@itzy.test");
    assert_eq!(json["user"]["collector_name"], "Midzy");
    assert!(json["user"].get("password_hash").is_none());
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
}

/// A second account with the same email is a conflict on `email`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "lia").await;

    let body = register_body("lia2", "lia@byeol.test", PASSWORD, PASSWORD);
    let response = post_json(app, "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["fields"]["email"].is_array());
}

/// Mismatched confirmation is reported against `password`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_password_mismatch(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = register_body("ryujin", "ryujin@byeol.test", PASSWORD, "Lightstick-2020!");

    let response = post_json(app, "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["fields"]["password"][0], "Passwords do not match.");
}

/// Every failed strength rule is listed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_weak_password_lists_problems(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = register_body("chaeryeong", "chaeryeong@byeol.test", "1234", "1234");

    let response = post_json(app, "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let problems: Vec<&str> = json["fields"]["password"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(problems.iter().any(|p| p.contains("too short")));
    assert!(problems.iter().any(|p| p.contains("entirely numeric")));
}

/// Usernames outside the allowed charset and malformed emails are rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_bad_username_and_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = register_body("has space", "space@byeol.test", PASSWORD, PASSWORD);
    let response = post_json(app.clone(), "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["username"].is_array());

    let body = register_body("noemail", "not-an-email", PASSWORD, PASSWORD);
    let response = post_json(app, "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["email"].is_array());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login matches the email case-insensitively and returns a fresh pair.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "yuna").await;

    let response = login(app, "YUNA@byeol.test", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "yuna");
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
}

/// Wrong password and unknown email are indistinguishable 401s.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_bad_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "yuna").await;

    let response = login(app.clone(), "yuna@byeol.test", "Wrong-password-1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let response = login(app, "nobody@byeol.test", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown = body_json(response).await;

    assert_eq!(wrong_password["error"], unknown["error"]);
}

/// A deactivated account can neither log in nor use its access token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_user_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let registered = register(app.clone(), "retired").await;
    let access = registered["access_token"].as_str().unwrap();

    UserRepo::deactivate(&pool, user_id(&registered)).await.unwrap();

    let response = login(app.clone(), "retired@byeol.test", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let inactive = body_json(response).await;

    // Indistinguishable from a wrong password.
    let response = login(app.clone(), "retired@byeol.test", "Wrong-password-1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, inactive);
    assert_eq!(inactive["error"], "Invalid credentials");

    let response = get_auth(app, "/api/auth/profile/", access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Token refresh
// ---------------------------------------------------------------------------

/// Refresh rotates the pair and the old refresh token cannot be replayed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_and_blocks_reuse(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "jisoo").await;
    let old_refresh = registered["refresh_token"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        "/api/auth/token/refresh/",
        json!({ "refresh": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_refresh = json["refresh_token"].as_str().unwrap();
    assert_ne!(new_refresh, old_refresh);

    // The new access token works.
    let access = json["access_token"].as_str().unwrap();
    let response = get_auth(app.clone(), "/api/auth/profile/", access).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Replaying the rotated token fails.
    let response = post_json(
        app.clone(),
        "/api/auth/token/refresh/",
        json!({ "refresh": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The replacement still works, via the alternate field name.
    let response = post_json(
        app,
        "/api/auth/token/refresh/",
        json!({ "refresh_token": new_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// An access token is not accepted as a refresh token and vice versa.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_types_are_not_interchangeable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "rose").await;
    let access = registered["access_token"].as_str().unwrap();
    let refresh = registered["refresh_token"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        "/api/auth/token/refresh/",
        json!({ "refresh": access }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/auth/profile/", refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout revokes the refresh token's session and is idempotent.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "lisa").await;
    let access = registered["access_token"].as_str().unwrap();
    let refresh = registered["refresh_token"].as_str().unwrap();

    for _ in 0..2 {
        let response = post_json_auth(
            app.clone(),
            "/api/auth/logout/",
            json!({ "refresh": refresh }),
            access,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Logged out successfully");
    }

    let response = post_json(app, "/api/auth/token/refresh/", json!({ "refresh": refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout requires authentication and a well-formed refresh token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "jennie").await;
    let access = registered["access_token"].as_str().unwrap();
    let refresh = registered["refresh_token"].as_str().unwrap();

    let response = post_json(app.clone(), "/api/auth/logout/", json!({ "refresh": refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        app,
        "/api/auth/logout/",
        json!({ "refresh": "garbage" }),
        access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["refresh"].is_array());
}

// ---------------------------------------------------------------------------
// Profile and statistics
// ---------------------------------------------------------------------------

/// The profile includes collection totals and only exposes safe fields.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_get_and_update(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::access_token(app.clone(), "wonyoung").await;

    let response = get(app.clone(), "/api/auth/profile/").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/auth/profile/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "wonyoung");
    assert_eq!(json["total_photocards"], 0);

    let response = patch_json_auth(
        app.clone(),
        "/api/auth/profile/",
        json!({ "collector_name": "Dive", "username": "ignored" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["collector_name"], "Dive");
    assert_eq!(json["username"], "wonyoung");

    let response = patch_json_auth(
        app.clone(),
        "/api/auth/profile/",
        json!({ "profile_pic": "https://img.byeol.test/dive.png" }),
        &token,
    )
    .await;
    assert_eq!(
        body_json(response).await["profile_pic"],
        "https://img.byeol.test/dive.png"
    );

    // `null` removes the picture; other fields are untouched.
    let response = patch_json_auth(
        app.clone(),
        "/api/auth/profile/",
        json!({ "profile_pic": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["profile_pic"].is_null());
    assert_eq!(json["collector_name"], "Dive");

    let response = patch_json_auth(
        app,
        "/api/auth/profile/",
        json!({ "profile_pic": "not a url" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["profile_pic"].is_array());
}

/// A new account's statistics are all zero, and both routes agree.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_for_empty_collection(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::access_token(app.clone(), "gaeul").await;

    let response = get_auth(app.clone(), "/api/auth/stats/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let from_auth = body_json(response).await;
    assert_eq!(from_auth["total_photocards"], 0);
    assert_eq!(from_auth["wishlist_items"], 0);
    assert_eq!(from_auth["completion_by_group"], json!([]));

    let response = get_auth(app, "/api/collection/stats/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, from_auth);
}

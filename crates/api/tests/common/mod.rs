#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use byeolpedia_api::auth::jwt::JwtConfig;
use byeolpedia_api::config::ServerConfig;
use byeolpedia_api::middleware::rate_limit::RateLimitConfig;
use byeolpedia_api::router::build_app_router;
use byeolpedia_api::state::AppState;
use byeolpedia_core::catalog::{ALBUM_TYPE_MINI, GROUP_TYPE_GIRL_GROUP, PHOTOCARD_TYPE_MEMBER};
use byeolpedia_db::models::album::{Album, AlbumVersion, CreateAlbum, CreateAlbumVersion};
use byeolpedia_db::models::group::{CreateGroup, Group};
use byeolpedia_db::models::lightstick::{CreateLightstick, Lightstick};
use byeolpedia_db::models::member::{CreateMember, Member};
use byeolpedia_db::models::photocard::{CreatePhotocard, Photocard};
use byeolpedia_db::repositories::{
    AlbumRepo, AlbumVersionRepo, GroupRepo, LightstickRepo, MemberRepo, PhotocardRepo,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const PASSWORD: &str = "Lightstick-2019!";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default)
/// and budgets large enough that ordinary tests never hit the rate limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production-use".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
        rate_limit: RateLimitConfig {
            anon_per_hour: 100,
            user_per_hour: 1000,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_config(pool, test_config())
}

pub fn build_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Register `username` through the API and return the response body
/// (`user`, `access_token`, `refresh_token`, `expires_in`).
pub async fn register(app: Router, username: &str) -> Value {
    let body = json!({
        "username": username,
        "email": format!("{username}@byeol.test"),
        "collector_name": format!("{username} collects"),
        "password": PASSWORD,
        "password_confirm": PASSWORD,
    });
    let response = post_json(app, "/api/auth/register/", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Register `username` and return its access token.
pub async fn access_token(app: Router, username: &str) -> String {
    register(app, username).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Catalog fixtures
// ---------------------------------------------------------------------------

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn new_group(pool: &PgPool, name: &str, group_type: &str) -> Group {
    GroupRepo::create(
        pool,
        &CreateGroup {
            name: name.to_string(),
            korean_name: format!("{name} (ko)"),
            debut_date: date(2019, 2, 12),
            agency: "JYP Entertainment".to_string(),
            group_type: group_type.to_string(),
            logo_image: None,
        },
    )
    .await
    .unwrap()
}

pub async fn new_member(pool: &PgPool, group: &Group, stage_name: &str) -> Member {
    MemberRepo::create(
        pool,
        &CreateMember {
            group_id: group.id,
            stage_name: stage_name.to_string(),
            real_name: format!("{stage_name} real"),
            birth_date: date(2000, 5, 26),
            position: "Vocalist".to_string(),
            is_active: true,
            profile_image: None,
        },
    )
    .await
    .unwrap()
}

pub async fn new_album(pool: &PgPool, group: &Group, title: &str) -> Album {
    AlbumRepo::create(
        pool,
        &CreateAlbum {
            group_id: group.id,
            title: title.to_string(),
            release_date: date(2021, 4, 30),
            album_type: ALBUM_TYPE_MINI.to_string(),
            cover_image: None,
        },
    )
    .await
    .unwrap()
}

pub async fn new_version(pool: &PgPool, album: &Album, name: &str) -> AlbumVersion {
    AlbumVersionRepo::create(
        pool,
        &CreateAlbumVersion {
            album_id: album.id,
            version_name: name.to_string(),
            cover_image: None,
            number_of_photocards: 2,
        },
    )
    .await
    .unwrap()
}

pub async fn new_photocard(
    pool: &PgPool,
    group: &Group,
    version: &AlbumVersion,
    member: Option<&Member>,
    name: &str,
) -> Photocard {
    PhotocardRepo::create(
        pool,
        &CreatePhotocard {
            group_id: group.id,
            album_version_id: version.id,
            member_id: member.map(|m| m.id),
            name: name.to_string(),
            image: None,
            release_date: date(2021, 4, 30),
            photocard_type: PHOTOCARD_TYPE_MEMBER.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn new_lightstick(pool: &PgPool, group: &Group, version: &str) -> Lightstick {
    LightstickRepo::create(
        pool,
        &CreateLightstick {
            group_id: group.id,
            name: format!("{} Official Lightstick", group.name),
            version: version.to_string(),
            image: None,
            release_date: date(2020, 8, 1),
        },
    )
    .await
    .unwrap()
}

/// One group with a member, an album version and a photocard of that member.
pub struct CatalogFixture {
    pub group: Group,
    pub member: Member,
    pub album: Album,
    pub version: AlbumVersion,
    pub photocard: Photocard,
    pub lightstick: Lightstick,
}

pub async fn catalog_fixture(pool: &PgPool, group_name: &str) -> CatalogFixture {
    let group = new_group(pool, group_name, GROUP_TYPE_GIRL_GROUP).await;
    let member = new_member(pool, &group, &format!("{group_name} Leader")).await;
    let album = new_album(pool, &group, &format!("{group_name} Mini 1")).await;
    let version = new_version(pool, &album, "Version A").await;
    let photocard = new_photocard(pool, &group, &version, Some(&member), "Selfie A").await;
    let lightstick = new_lightstick(pool, &group, "Ver. 1").await;
    CatalogFixture {
        group,
        member,
        album,
        version,
        photocard,
        lightstick,
    }
}

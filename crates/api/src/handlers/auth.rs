//! Handlers for the `/auth` resource (register, login, logout, refresh).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use byeolpedia_core::error::CoreError;
use byeolpedia_core::types::DbId;
use byeolpedia_db::models::session::CreateSession;
use byeolpedia_db::models::user::{CreateUser, UserResponse};
use byeolpedia_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{hash_refresh_token, issue_token, validate_token, TokenType};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register/`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has 1 to 150 characters."))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, max = 150, message = "Ensure this field has 1 to 150 characters."))]
    pub collector_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request body for `POST /auth/login/`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

/// Request body for `POST /auth/logout/` and `POST /auth/token/refresh/`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(alias = "refresh_token")]
    pub refresh: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Returned by refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register/
///
/// Create an account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;

    let username = input.username.trim();
    if !is_valid_username(username) {
        return Err(CoreError::invalid_field(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )
        .into());
    }
    let email = input.email.trim().to_lowercase();

    if input.password != input.password_confirm {
        return Err(CoreError::invalid_field("password", "Passwords do not match.").into());
    }
    if let Err(problems) = validate_password_strength(&input.password, username, &email) {
        return Err(AppError::InvalidFields(FieldErrors::from([(
            "password".to_string(),
            problems,
        )])));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            email,
            collector_name: input.collector_name.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    let tokens = issue_token_pair(&state, user.id).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }),
    ))
}

/// POST /api/auth/login/
///
/// Authenticate with email + password. Returns the user and a token pair.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let email = input.email.trim().to_lowercase();
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    // Same error as a bad password.
    if !user.is_active {
        tracing::info!(user_id = %user.id, "Login attempt on inactive account");
        return Err(invalid());
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    let tokens = issue_token_pair(&state, user.id).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
    }))
}

/// POST /api/auth/logout/
///
/// Revoke the caller's session for the given refresh token. Succeeds even if
/// the session was already revoked.
pub async fn logout(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RefreshRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_token(&input.refresh, TokenType::Refresh, &state.config.jwt)
        .map_err(|e| CoreError::invalid_field("refresh", e.to_string()))?;

    let hash = hash_refresh_token(&input.refresh);
    let revoked = SessionRepo::revoke_for_user(&state.pool, auth.user_id, &hash).await?;
    tracing::info!(user_id = %auth.user_id, revoked, "User logged out");

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// POST /api/auth/token/refresh/
///
/// Exchange a refresh token for a new pair. The presented token's session is
/// revoked in the same statement that reads it, so it can be used only once.
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let claims = validate_token(&input.refresh, TokenType::Refresh, &state.config.jwt)
        .map_err(|e| AppError::Core(CoreError::Unauthorized(e.to_string())))?;

    let hash = hash_refresh_token(&input.refresh);
    let session = SessionRepo::consume(&state.pool, &hash)
        .await?
        .filter(|s| s.user_id == claims.sub)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Token is blacklisted".into())))?;

    let active = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .is_some_and(|u| u.is_active);
    if !active {
        return Err(AppError::Core(CoreError::Unauthorized(
            "User not found or inactive".into(),
        )));
    }

    let tokens = issue_token_pair(&state, session.user_id).await?;
    tracing::debug!(user_id = %session.user_id, "Refresh token rotated");

    Ok(Json(tokens))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign a new access/refresh pair and record the refresh token's session.
async fn issue_token_pair(state: &AppState, user_id: DbId) -> AppResult<TokenPair> {
    let jwt = &state.config.jwt;
    let sign_error = |e: jsonwebtoken::errors::Error| {
        AppError::InternalError(format!("Token generation error: {e}"))
    };

    let access = issue_token(user_id, TokenType::Access, jwt).map_err(sign_error)?;
    let refresh = issue_token(user_id, TokenType::Refresh, jwt).map_err(sign_error)?;

    let swept = SessionRepo::delete_stale_for_user(&state.pool, user_id).await?;
    if swept > 0 {
        tracing::debug!(%user_id, swept, "Removed stale sessions");
    }

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id,
            refresh_token_hash: hash_refresh_token(&refresh.token),
            expires_at: refresh.expires_at,
        },
    )
    .await?;

    Ok(TokenPair {
        access_token: access.token,
        refresh_token: refresh.token,
        expires_in: jwt.access_token_expiry_secs(),
    })
}

/// Letters, digits and `@ . + - _`.
fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

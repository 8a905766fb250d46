//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use byeolpedia_core::error::CoreError;
use byeolpedia_core::types::DbId;
use byeolpedia_db::models::user::User;
use byeolpedia_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, TokenType};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token must be a valid, unexpired access token and its subject must
/// still exist and be active; otherwise the request is rejected with 401
/// before the handler runs.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user row as loaded for this request.
    pub user: User,
}

/// The token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            )));
        }

        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, TokenType::Access, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(CoreError::Unauthorized(
                "Given token not valid for any token type".into(),
            ))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User not found or inactive".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            user,
        })
    }
}

//! Handlers for favorite groups (`/collection/favorites`).
//!
//! Another user's favorite is reported as missing.

use std::collections::HashMap;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use byeolpedia_core::error::CoreError;
use byeolpedia_core::types::DbId;
use byeolpedia_db::models::favorite::FavoriteGroupResponse;
use byeolpedia_db::repositories::{FavoriteRepo, GroupRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::response::Paginated;
use crate::state::AppState;

/// Request body for `POST /collection/favorites/`.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(alias = "group_id")]
    pub group: DbId,
}

/// GET /api/collection/favorites/
pub async fn list_favorites(
    auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<HashMap<String, String>>,
) -> AppResult<Json<Paginated<FavoriteGroupResponse>>> {
    let query = FavoriteRepo::LIST.parse(&params)?;
    let current = query.page;
    let page = FavoriteRepo::list(&state.pool, auth.user_id, query).await?;
    Ok(Json(Paginated::from_page(page, current, &uri)?))
}

/// POST /api/collection/favorites/ and POST /api/collection/favorites/add/
///
/// 404 if the group does not exist; a repeated group is a conflict.
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<FavoriteGroupResponse>)> {
    if !GroupRepo::exists(&state.pool, input.group).await? {
        return Err(CoreError::NotFound {
            entity: "Group",
            id: input.group,
        }
        .into());
    }

    let row = FavoriteRepo::create(&state.pool, auth.user_id, input.group).await?;
    tracing::info!(user_id = %auth.user_id, group_id = %input.group, "Favorite group added");

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// GET /api/collection/favorites/{id}/
pub async fn get_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<FavoriteGroupResponse>> {
    let row = FavoriteRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FavoriteGroup",
            id,
        })?;
    Ok(Json(row.into()))
}

/// DELETE /api/collection/favorites/{id}/
pub async fn delete_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if !FavoriteRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(CoreError::NotFound {
            entity: "FavoriteGroup",
            id,
        }
        .into());
    }
    tracing::info!(user_id = %auth.user_id, favorite_id = %id, "Favorite group removed");
    Ok(StatusCode::NO_CONTENT)
}

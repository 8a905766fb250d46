//! Handlers for the signed-in user's wishlist (`/collection/wishlist`).

use std::collections::HashMap;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use byeolpedia_core::collectible::{validate_priority, CollectibleRef, CollectibleType};
use byeolpedia_core::error::CoreError;
use byeolpedia_core::types::DbId;
use byeolpedia_db::models::wishlist::{
    CreateWishlistItem, UpdateWishlistItem, WishlistResponse, WishlistRow,
};
use byeolpedia_db::repositories::WishlistRepo;
use byeolpedia_db::DbPool;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::collection::ensure_catalog_item;
use crate::middleware::auth::AuthUser;
use crate::response::Paginated;
use crate::state::AppState;

/// Request body for `POST /collection/wishlist/`.
#[derive(Debug, Deserialize)]
pub struct CreateWishlistRequest {
    pub collectible_type: String,
    pub photocard: Option<DbId>,
    pub lightstick: Option<DbId>,
    pub priority: Decimal,
}

/// Request body for `PATCH /collection/wishlist/{id}/`.
#[derive(Debug, Deserialize)]
pub struct UpdateWishlistRequest {
    pub collectible_type: Option<String>,
    pub photocard: Option<DbId>,
    pub lightstick: Option<DbId>,
    pub priority: Option<Decimal>,
}

/// GET /api/collection/wishlist/
pub async fn list_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<HashMap<String, String>>,
) -> AppResult<Json<Paginated<WishlistResponse>>> {
    let query = WishlistRepo::LIST.parse(&params)?;
    let current = query.page;
    let page = WishlistRepo::list(&state.pool, auth.user_id, query).await?;
    Ok(Json(Paginated::from_page(page, current, &uri)?))
}

/// POST /api/collection/wishlist/ and POST /api/collection/wishlist/add/
pub async fn create_wishlist_item(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateWishlistRequest>,
) -> AppResult<(StatusCode, Json<WishlistResponse>)> {
    let kind: CollectibleType = input.collectible_type.parse()?;
    let item = CollectibleRef::from_parts(kind, input.photocard, input.lightstick)?;
    ensure_catalog_item(&state.pool, item).await?;
    validate_priority(&input.priority)?;

    let row = WishlistRepo::create(
        &state.pool,
        auth.user_id,
        &CreateWishlistItem {
            item,
            priority: input.priority,
        },
    )
    .await?;
    tracing::info!(user_id = %auth.user_id, wishlist_id = %row.id, kind = %kind, "Wishlist item added");

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// GET /api/collection/wishlist/{id_or_type}/
pub async fn get_wishlist_item_or_type(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(segment): ApiPath<String>,
) -> AppResult<Response> {
    if let Ok(id) = segment.parse::<DbId>() {
        let row = owned_item(&state.pool, id, &auth).await?;
        return Ok(Json(WishlistResponse::from(row)).into_response());
    }

    let kind: CollectibleType = segment.parse()?;
    let rows = WishlistRepo::list_by_type(&state.pool, auth.user_id, kind).await?;
    let items: Vec<WishlistResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(items).into_response())
}

/// PATCH /api/collection/wishlist/{id}/
pub async fn update_wishlist_item(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateWishlistRequest>,
) -> AppResult<Json<WishlistResponse>> {
    let row = owned_item(&state.pool, id, &auth).await?;

    let kind = input
        .collectible_type
        .as_deref()
        .map(str::parse::<CollectibleType>)
        .transpose()?;
    let current = CollectibleRef::from_row(&row.collectible_type, row.photocard_id, row.lightstick_id)?;
    let item = current.merge(kind, input.photocard, input.lightstick)?;
    if item != current {
        ensure_catalog_item(&state.pool, item).await?;
    }
    if let Some(priority) = &input.priority {
        validate_priority(priority)?;
    }

    let updated = WishlistRepo::update(
        &state.pool,
        id,
        auth.user_id,
        &UpdateWishlistItem {
            item,
            priority: input.priority,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "WishlistItem",
        id,
    })?;

    Ok(Json(updated.into()))
}

/// DELETE /api/collection/wishlist/{id}/
pub async fn delete_wishlist_item(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    owned_item(&state.pool, id, &auth).await?;
    WishlistRepo::delete(&state.pool, id, auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, wishlist_id = %id, "Wishlist item removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_item(pool: &DbPool, id: DbId, auth: &AuthUser) -> AppResult<WishlistRow> {
    let row = WishlistRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "WishlistItem",
            id,
        })?;
    if row.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        )));
    }
    Ok(row)
}

//! Handlers for the signed-in user's collection (`/collection/collectibles`).
//!
//! Entries are visible only to their owner: another user's entry is 403 on
//! every method, a missing one 404.

use std::collections::HashMap;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use byeolpedia_core::collectible::{
    validate_purchase_price, validate_quantity, CollectibleRef, CollectibleType,
};
use byeolpedia_core::error::CoreError;
use byeolpedia_core::types::DbId;
use byeolpedia_db::models::collectible::{
    CollectibleResponse, CollectibleRow, CreateCollectible, UpdateCollectible,
};
use byeolpedia_db::repositories::{CollectibleRepo, LightstickRepo, PhotocardRepo};
use byeolpedia_db::DbPool;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{nullable, ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

fn default_quantity() -> i32 {
    1
}

/// Request body for `POST /collection/collectibles/`.
///
/// Unknown fields, including any attempt to set the owner, are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCollectibleRequest {
    pub collectible_type: String,
    pub photocard: Option<DbId>,
    pub lightstick: Option<DbId>,
    pub source: String,
    pub acquisition_date: NaiveDate,
    pub purchase_price: Option<Decimal>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[validate(url(message = "Enter a valid URL."))]
    pub photo: Option<String>,
    #[serde(default)]
    pub is_duplicate: bool,
}

/// Request body for `PATCH /collection/collectibles/{id}/`. Absent fields
/// keep their stored value; `null` clears `purchase_price` and `photo`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCollectibleRequest {
    pub collectible_type: Option<String>,
    pub photocard: Option<DbId>,
    pub lightstick: Option<DbId>,
    pub source: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_price: Option<Option<Decimal>>,
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Enter a valid URL."))]
    pub photo: Option<Option<String>>,
    pub is_duplicate: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/collection/collectibles/
pub async fn list_collectibles(
    auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<HashMap<String, String>>,
) -> AppResult<Json<Paginated<CollectibleResponse>>> {
    let query = CollectibleRepo::LIST.parse(&params)?;
    let current = query.page;
    let page = CollectibleRepo::list(&state.pool, auth.user_id, query).await?;
    Ok(Json(Paginated::from_page(page, current, &uri)?))
}

/// POST /api/collection/collectibles/ and POST /api/collection/collectibles/add/
pub async fn create_collectible(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCollectibleRequest>,
) -> AppResult<(StatusCode, Json<CollectibleResponse>)> {
    input.validate()?;

    let kind: CollectibleType = input.collectible_type.parse()?;
    let item = CollectibleRef::from_parts(kind, input.photocard, input.lightstick)?;
    ensure_catalog_item(&state.pool, item).await?;
    if let Some(price) = &input.purchase_price {
        validate_purchase_price(price)?;
    }
    validate_quantity(input.quantity)?;
    let source = clean_source(&input.source)?;

    let row = CollectibleRepo::create(
        &state.pool,
        auth.user_id,
        &CreateCollectible {
            item,
            source,
            acquisition_date: input.acquisition_date,
            purchase_price: input.purchase_price,
            quantity: input.quantity,
            photo: input.photo,
            is_duplicate: input.is_duplicate,
        },
    )
    .await?;
    tracing::info!(user_id = %auth.user_id, collectible_id = %row.id, kind = %kind, "Collectible added");

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// GET /api/collection/collectibles/{id_or_type}/
///
/// A UUID selects one entry; `photocard` or `lightstick` lists every entry
/// of that type, unpaginated.
pub async fn get_collectible_or_type(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(segment): ApiPath<String>,
) -> AppResult<Response> {
    if let Ok(id) = segment.parse::<DbId>() {
        let row = owned_collectible(&state.pool, id, &auth).await?;
        return Ok(Json(CollectibleResponse::from(row)).into_response());
    }

    let kind: CollectibleType = segment.parse()?;
    let rows = CollectibleRepo::list_by_type(&state.pool, auth.user_id, kind).await?;
    let items: Vec<CollectibleResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(items).into_response())
}

/// PATCH /api/collection/collectibles/{id}/
pub async fn update_collectible(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateCollectibleRequest>,
) -> AppResult<Json<CollectibleResponse>> {
    input.validate()?;
    let row = owned_collectible(&state.pool, id, &auth).await?;

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
    if let Some(Some(price)) = &input.purchase_price {
        validate_purchase_price(price)?;
    }
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity)?;
    }
    let source = input.source.as_deref().map(clean_source).transpose()?;

    let updated = CollectibleRepo::update(
        &state.pool,
        id,
        auth.user_id,
        &UpdateCollectible {
            item,
            source,
            acquisition_date: input.acquisition_date,
            purchase_price: input.purchase_price,
            quantity: input.quantity,
            photo: input.photo,
            is_duplicate: input.is_duplicate,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Collectible",
        id,
    })?;
    tracing::info!(user_id = %auth.user_id, collectible_id = %id, "Collectible updated");

    Ok(Json(updated.into()))
}

/// DELETE /api/collection/collectibles/{id}/
pub async fn delete_collectible(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    owned_collectible(&state.pool, id, &auth).await?;
    CollectibleRepo::delete(&state.pool, id, auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, collectible_id = %id, "Collectible removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an entry, distinguishing missing (404) from someone else's (403).
async fn owned_collectible(pool: &DbPool, id: DbId, auth: &AuthUser) -> AppResult<CollectibleRow> {
    let row = CollectibleRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collectible",
            id,
        })?;
    if row.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        )));
    }
    Ok(row)
}

/// The referenced catalog row must exist; a dangling id is reported against
/// the field that carried it.
pub(crate) async fn ensure_catalog_item(pool: &DbPool, item: CollectibleRef) -> AppResult<()> {
    let (field, exists, id) = match item {
        CollectibleRef::Photocard(id) => ("photocard", PhotocardRepo::exists(pool, id).await?, id),
        CollectibleRef::Lightstick(id) => ("lightstick", LightstickRepo::exists(pool, id).await?, id),
    };
    if exists {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            field,
            format!("Invalid pk \"{id}\" - object does not exist."),
        )
        .into())
    }
}

/// Trim `source`; the trimmed value must have 1 to 100 characters.
fn clean_source(raw: &str) -> Result<String, CoreError> {
    let source = raw.trim();
    if (1..=100).contains(&source.chars().count()) {
        Ok(source.to_string())
    } else {
        Err(CoreError::invalid_field(
            "source",
            "Ensure this field has 1 to 100 characters.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn source_is_checked_after_trimming() {
        assert_eq!(clean_source("  Weverse Shop ").unwrap(), "Weverse Shop");
        assert_matches!(
            clean_source("   "),
            Err(CoreError::InvalidField { ref field, .. }) if field == "source"
        );
        assert!(clean_source(&format!("  {}  ", "a".repeat(100))).is_ok());
        assert!(clean_source(&"a".repeat(101)).is_err());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let absent: UpdateCollectibleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.purchase_price, None);
        assert_eq!(absent.photo, None);

        let cleared: UpdateCollectibleRequest =
            serde_json::from_str(r#"{"purchase_price": null, "photo": null}"#).unwrap();
        assert_eq!(cleared.purchase_price, Some(None));
        assert_eq!(cleared.photo, Some(None));

        let set: UpdateCollectibleRequest =
            serde_json::from_str(r#"{"purchase_price": "4.50"}"#).unwrap();
        assert_eq!(set.purchase_price, Some(Some(Decimal::new(450, 2))));
    }
}

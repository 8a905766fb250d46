//! Wishlist entries.

use byeolpedia_core::collectible::CollectibleRef;
use byeolpedia_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::collectible::CatalogDetails;
use crate::models::lightstick::LightstickListItem;
use crate::models::photocard::PhotocardListItem;

/// A `wishlist_items` row joined with its catalog item's list fields.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistRow {
    pub id: DbId,
    pub user_id: DbId,
    pub collectible_type: String,
    pub photocard_id: Option<DbId>,
    pub lightstick_id: Option<DbId>,
    pub priority: Decimal,
    pub created_at: Timestamp,
    #[sqlx(flatten)]
    pub details: CatalogDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct WishlistResponse {
    pub id: DbId,
    pub collectible_type: String,
    pub photocard: Option<DbId>,
    pub lightstick: Option<DbId>,
    pub priority: Decimal,
    pub created_at: Timestamp,
    pub photocard_details: Option<PhotocardListItem>,
    pub lightstick_details: Option<LightstickListItem>,
    pub collectible_name: String,
}

impl From<WishlistRow> for WishlistResponse {
    fn from(row: WishlistRow) -> Self {
        Self {
            photocard_details: row.details.photocard(row.photocard_id),
            lightstick_details: row.details.lightstick(row.lightstick_id),
            collectible_name: row.details.collectible_name(&row.collectible_type),
            id: row.id,
            collectible_type: row.collectible_type,
            photocard: row.photocard_id,
            lightstick: row.lightstick_id,
            priority: row.priority,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateWishlistItem {
    pub item: CollectibleRef,
    pub priority: Decimal,
}

#[derive(Debug, Clone)]
pub struct UpdateWishlistItem {
    pub item: CollectibleRef,
    pub priority: Option<Decimal>,
}

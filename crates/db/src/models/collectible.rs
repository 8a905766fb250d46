//! Collection entries and their joined catalog details.

use byeolpedia_core::collectible::CollectibleRef;
use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::lightstick::LightstickListItem;
use crate::models::photocard::PhotocardListItem;

/// A `user_collectibles` row joined with the list fields of whichever catalog
/// item it references. Exactly one of the `photocard_*` / `lightstick_*`
/// groups is populated.
#[derive(Debug, Clone, FromRow)]
pub struct CollectibleRow {
    pub id: DbId,
    pub user_id: DbId,
    pub collectible_type: String,
    pub photocard_id: Option<DbId>,
    pub lightstick_id: Option<DbId>,
    pub source: String,
    pub acquisition_date: NaiveDate,
    pub purchase_price: Option<Decimal>,
    pub quantity: i32,
    pub photo: Option<String>,
    pub is_duplicate: bool,
    pub created_at: Timestamp,
    #[sqlx(flatten)]
    pub details: CatalogDetails,
}

/// Catalog columns joined onto collection and wishlist rows.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogDetails {
    pub photocard_name: Option<String>,
    pub photocard_image: Option<String>,
    pub photocard_type: Option<String>,
    pub photocard_group_name: Option<String>,
    pub photocard_member_name: Option<String>,
    pub lightstick_name: Option<String>,
    pub lightstick_version: Option<String>,
    pub lightstick_image: Option<String>,
    pub lightstick_group_name: Option<String>,
}

impl CatalogDetails {
    pub fn photocard(&self, id: Option<DbId>) -> Option<PhotocardListItem> {
        Some(PhotocardListItem {
            id: id?,
            name: self.photocard_name.clone()?,
            image: self.photocard_image.clone(),
            photocard_type: self.photocard_type.clone()?,
            group_name: self.photocard_group_name.clone()?,
            member_name: self.photocard_member_name.clone(),
        })
    }

    pub fn lightstick(&self, id: Option<DbId>) -> Option<LightstickListItem> {
        Some(LightstickListItem {
            id: id?,
            name: self.lightstick_name.clone()?,
            version: self.lightstick_version.clone()?,
            image: self.lightstick_image.clone(),
            group_name: self.lightstick_group_name.clone()?,
        })
    }

    /// Display name of the referenced item.
    pub fn collectible_name(&self, collectible_type: &str) -> String {
        self.photocard_name
            .clone()
            .or_else(|| self.lightstick_name.clone())
            .unwrap_or_else(|| format!("Unknown {collectible_type}"))
    }
}

/// API representation of a collection entry.
#[derive(Debug, Clone, Serialize)]
pub struct CollectibleResponse {
    pub id: DbId,
    pub collectible_type: String,
    pub photocard: Option<DbId>,
    pub lightstick: Option<DbId>,
    pub source: String,
    pub acquisition_date: NaiveDate,
    pub purchase_price: Option<Decimal>,
    pub quantity: i32,
    pub photo: Option<String>,
    pub is_duplicate: bool,
    pub created_at: Timestamp,
    pub photocard_details: Option<PhotocardListItem>,
    pub lightstick_details: Option<LightstickListItem>,
    pub collectible_name: String,
}

impl From<CollectibleRow> for CollectibleResponse {
    fn from(row: CollectibleRow) -> Self {
        Self {
            photocard_details: row.details.photocard(row.photocard_id),
            lightstick_details: row.details.lightstick(row.lightstick_id),
            collectible_name: row.details.collectible_name(&row.collectible_type),
            id: row.id,
            collectible_type: row.collectible_type,
            photocard: row.photocard_id,
            lightstick: row.lightstick_id,
            source: row.source,
            acquisition_date: row.acquisition_date,
            purchase_price: row.purchase_price,
            quantity: row.quantity,
            photo: row.photo,
            is_duplicate: row.is_duplicate,
            created_at: row.created_at,
        }
    }
}

/// Validated input for a new collection entry.
#[derive(Debug, Clone)]
pub struct CreateCollectible {
    pub item: CollectibleRef,
    pub source: String,
    pub acquisition_date: NaiveDate,
    pub purchase_price: Option<Decimal>,
    pub quantity: i32,
    pub photo: Option<String>,
    pub is_duplicate: bool,
}

/// Partial update. `item` is the already-merged reference; every other
/// `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct UpdateCollectible {
    pub item: CollectibleRef,
    pub source: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    /// `Some(None)` clears the stored price.
    pub purchase_price: Option<Option<Decimal>>,
    pub quantity: Option<i32>,
    /// `Some(None)` clears the stored photo.
    pub photo: Option<Option<String>>,
    pub is_duplicate: Option<bool>,
}

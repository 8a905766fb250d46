//! Photocard entity model and DTOs.

use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `photocards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photocard {
    pub id: DbId,
    #[serde(rename = "group")]
    pub group_id: DbId,
    #[serde(rename = "album_version")]
    pub album_version_id: DbId,
    #[serde(rename = "member")]
    pub member_id: Option<DbId>,
    pub name: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
    pub photocard_type: String,
    pub created_at: Timestamp,
}

/// Photocard as it appears in lists and embedded in collection entries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotocardListItem {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub photocard_type: String,
    pub group_name: String,
    pub member_name: Option<String>,
}

/// Photocard detail with names of every related catalog row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotocardDetail {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
    pub photocard_type: String,
    pub group_name: String,
    pub member_name: Option<String>,
    pub album_name: String,
    pub version_name: String,
    #[serde(rename = "group")]
    pub group_id: DbId,
    #[serde(rename = "album_version")]
    pub album_version_id: DbId,
    #[serde(rename = "member")]
    pub member_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhotocard {
    pub group_id: DbId,
    pub album_version_id: DbId,
    pub member_id: Option<DbId>,
    pub name: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
    pub photocard_type: String,
}

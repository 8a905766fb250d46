//! Album and album version models.

use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::group::GroupListItem;

/// A row from the `albums` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: DbId,
    #[serde(rename = "group")]
    pub group_id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    pub album_type: String,
    pub cover_image: Option<String>,
    pub created_at: Timestamp,
}

/// Album as it appears in lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlbumListItem {
    pub id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    pub album_type: String,
    pub cover_image: Option<String>,
    pub group_name: String,
}

/// Album detail with its group, versions and photocard total.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumDetail {
    pub id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    pub album_type: String,
    pub cover_image: Option<String>,
    pub group: GroupListItem,
    pub versions: Vec<AlbumVersionItem>,
    pub total_photocards: i64,
}

/// A row from the `album_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlbumVersion {
    pub id: DbId,
    #[serde(rename = "album")]
    pub album_id: DbId,
    pub version_name: String,
    pub cover_image: Option<String>,
    pub number_of_photocards: i32,
    pub created_at: Timestamp,
}

/// Album version with the number of photocards actually in the catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlbumVersionItem {
    pub id: DbId,
    #[serde(rename = "album")]
    pub album_id: DbId,
    pub version_name: String,
    pub cover_image: Option<String>,
    pub number_of_photocards: i32,
    pub photocards_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlbum {
    pub group_id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    pub album_type: String,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlbumVersion {
    pub album_id: DbId,
    pub version_name: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub number_of_photocards: i32,
}

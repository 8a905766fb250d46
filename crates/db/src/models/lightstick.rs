//! Lightstick entity model and DTOs.

use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lightsticks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lightstick {
    pub id: DbId,
    #[serde(rename = "group")]
    pub group_id: DbId,
    pub name: String,
    pub version: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
    pub created_at: Timestamp,
}

/// Lightstick as it appears in lists and embedded in collection entries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LightstickListItem {
    pub id: DbId,
    pub name: String,
    pub version: String,
    pub image: Option<String>,
    pub group_name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LightstickDetail {
    pub id: DbId,
    pub name: String,
    pub version: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
    pub group_name: String,
    #[serde(rename = "group")]
    pub group_id: DbId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLightstick {
    pub group_id: DbId,
    pub name: String,
    pub version: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
}

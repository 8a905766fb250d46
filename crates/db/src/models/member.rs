//! Member entity model and DTOs.

use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    #[serde(rename = "group")]
    pub group_id: DbId,
    pub stage_name: String,
    pub real_name: String,
    pub birth_date: NaiveDate,
    pub position: String,
    pub is_active: bool,
    pub profile_image: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub group_id: DbId,
    pub stage_name: String,
    pub real_name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub profile_image: Option<String>,
}

fn default_true() -> bool {
    true
}

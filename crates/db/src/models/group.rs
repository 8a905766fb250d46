//! Group entity model and DTOs.

use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::member::Member;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub korean_name: String,
    pub debut_date: NaiveDate,
    pub agency: String,
    pub group_type: String,
    pub logo_image: Option<String>,
    pub created_at: Timestamp,
}

/// Group as it appears in lists and when embedded in other resources.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupListItem {
    pub id: DbId,
    pub name: String,
    pub korean_name: String,
    pub debut_date: NaiveDate,
    pub agency: String,
    pub group_type: String,
    pub logo_image: Option<String>,
    /// Active members only.
    pub member_count: i64,
}

/// Group detail: the row plus its members and album count.
#[derive(Debug, Clone, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<Member>,
    pub album_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub korean_name: String,
    pub debut_date: NaiveDate,
    pub agency: String,
    pub group_type: String,
    pub logo_image: Option<String>,
}

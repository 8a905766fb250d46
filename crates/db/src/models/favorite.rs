//! Favorite groups.

use byeolpedia_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::group::GroupListItem;

/// A `user_favorite_groups` row joined with the group's list fields.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteGroupRow {
    pub id: DbId,
    pub user_id: DbId,
    pub group_id: DbId,
    pub created_at: Timestamp,
    pub group_name: String,
    pub group_korean_name: String,
    pub group_debut_date: NaiveDate,
    pub group_agency: String,
    pub group_type: String,
    pub group_logo_image: Option<String>,
    pub group_member_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteGroupResponse {
    pub id: DbId,
    pub group: DbId,
    pub created_at: Timestamp,
    pub group_details: GroupListItem,
}

impl From<FavoriteGroupRow> for FavoriteGroupResponse {
    fn from(row: FavoriteGroupRow) -> Self {
        Self {
            id: row.id,
            group: row.group_id,
            created_at: row.created_at,
            group_details: GroupListItem {
                id: row.group_id,
                name: row.group_name,
                korean_name: row.group_korean_name,
                debut_date: row.group_debut_date,
                agency: row.group_agency,
                group_type: row.group_type,
                logo_image: row.group_logo_image,
                member_count: row.group_member_count,
            },
        }
    }
}

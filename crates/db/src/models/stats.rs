//! Collection statistics.

use byeolpedia_core::types::DbId;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Per-type totals over a user's collection. Duplicates count as rows.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct CollectionTotals {
    pub total_albums: i64,
    pub total_photocards: i64,
    pub total_lightsticks: i64,
}

/// Completion of one favorite group's photocard catalog.
#[derive(Debug, Clone, Serialize)]
pub struct GroupCompletion {
    pub group_id: DbId,
    pub group_name: String,
    pub total_photocards: i64,
    pub user_photocards: i64,
    pub completion_percentage: f64,
}

/// Snapshot of a user's collection taken inside one read-only transaction.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub total_albums: i64,
    pub total_photocards: i64,
    pub total_lightsticks: i64,
    pub total_value: Decimal,
    pub duplicate_photocards: i64,
    pub duplicate_lightsticks: i64,
    pub wishlist_items: i64,
    pub favorite_groups: i64,
    pub completion_by_group: Vec<GroupCompletion>,
}

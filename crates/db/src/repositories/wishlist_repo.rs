//! Repository for the `wishlist_items` table.

use byeolpedia_core::collectible::{CollectibleType, COLLECTIBLE_TYPES};
use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, Page};
use crate::models::wishlist::{CreateWishlistItem, UpdateWishlistItem, WishlistRow};
use crate::repositories::collectible_repo::{detail_joins, DETAIL_COLUMNS};

const ROW_COLUMNS: &str = "w.id, w.user_id, w.collectible_type, w.photocard_id, \
                           w.lightstick_id, w.priority, w.created_at";

fn select() -> String {
    format!("{ROW_COLUMNS}, {DETAIL_COLUMNS}")
}

fn from(table: &str) -> String {
    format!("FROM {table} {}", detail_joins("w"))
}

/// Provides per-user wishlist operations.
pub struct WishlistRepo;

impl WishlistRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact(
                "collectible_type",
                "w.collectible_type",
                FieldKind::Choice(COLLECTIBLE_TYPES),
            ),
            FilterField::min("min_priority", "w.priority"),
            FilterField::max("max_priority", "w.priority"),
            FilterField::after("added_after", "w.created_at"),
            FilterField::before("added_before", "w.created_at"),
        ],
        search: &["p.name", "l.name"],
        ordering: &[
            OrderField::new("priority", "w.priority"),
            OrderField::new("created_at", "w.created_at"),
        ],
        default_ordering: &[Ordering::desc("w.priority"), Ordering::desc("w.created_at")],
        tiebreaker: "w.id",
    };

    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateWishlistItem,
    ) -> Result<WishlistRow, sqlx::Error> {
        let query = format!(
            "WITH w AS (
                INSERT INTO wishlist_items
                    (user_id, collectible_type, photocard_id, lightstick_id, priority)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
             )
             SELECT {} {}",
            select(),
            from("w"),
        );
        sqlx::query_as::<_, WishlistRow>(&query)
            .bind(user_id)
            .bind(input.item.kind().as_str())
            .bind(input.item.photocard_id())
            .bind(input.item.lightstick_id())
            .bind(input.priority)
            .fetch_one(pool)
            .await
    }

    /// Find an item by id regardless of owner; callers check `user_id`.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WishlistRow>, sqlx::Error> {
        let query = format!(
            "SELECT {} {} WHERE w.id = $1",
            select(),
            from("wishlist_items w")
        );
        sqlx::query_as::<_, WishlistRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateWishlistItem,
    ) -> Result<Option<WishlistRow>, sqlx::Error> {
        let query = format!(
            "WITH w AS (
                UPDATE wishlist_items SET
                    collectible_type = $3,
                    photocard_id = $4,
                    lightstick_id = $5,
                    priority = COALESCE($6, priority)
                WHERE id = $1 AND user_id = $2
                RETURNING *
             )
             SELECT {} {}",
            select(),
            from("w"),
        );
        sqlx::query_as::<_, WishlistRow>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.item.kind().as_str())
            .bind(input.item.photocard_id())
            .bind(input.item.lightstick_id())
            .bind(input.priority)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        query: ListQuery,
    ) -> Result<Page<WishlistRow>, sqlx::Error> {
        let query = query.scoped("w.user_id", user_id);
        fetch_page(pool, &select(), &from("wishlist_items w"), &query).await
    }

    pub async fn list_by_type(
        pool: &PgPool,
        user_id: DbId,
        kind: CollectibleType,
    ) -> Result<Vec<WishlistRow>, sqlx::Error> {
        let query = format!(
            "SELECT {} {}
             WHERE w.user_id = $1 AND w.collectible_type = $2
             ORDER BY w.priority DESC, w.created_at DESC, w.id",
            select(),
            from("wishlist_items w"),
        );
        sqlx::query_as::<_, WishlistRow>(&query)
            .bind(user_id)
            .bind(kind.as_str())
            .fetch_all(pool)
            .await
    }
}

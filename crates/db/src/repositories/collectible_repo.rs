//! Repository for the `user_collectibles` table.
//!
//! Every read joins the referenced photocard or lightstick so that responses
//! can embed the catalog item without a second round trip. Writes use a
//! data-modifying CTE named like the table alias so the same projection
//! applies to the inserted or updated row.

use byeolpedia_core::collectible::{CollectibleType, COLLECTIBLE_TYPES};
use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, Page};
use crate::models::collectible::{CollectibleRow, CreateCollectible, UpdateCollectible};

/// Catalog columns selected into
/// [`CatalogDetails`](crate::models::collectible::CatalogDetails).
pub(crate) const DETAIL_COLUMNS: &str = "p.name AS photocard_name, p.image AS photocard_image, \
     p.photocard_type, pg.name AS photocard_group_name, m.stage_name AS photocard_member_name, \
     l.name AS lightstick_name, l.version AS lightstick_version, l.image AS lightstick_image, \
     lg.name AS lightstick_group_name";

/// Joins feeding [`DETAIL_COLUMNS`] from the row aliased `alias`.
pub(crate) fn detail_joins(alias: &str) -> String {
    format!(
        "LEFT JOIN photocards p ON p.id = {alias}.photocard_id
         LEFT JOIN groups pg ON pg.id = p.group_id
         LEFT JOIN members m ON m.id = p.member_id
         LEFT JOIN lightsticks l ON l.id = {alias}.lightstick_id
         LEFT JOIN groups lg ON lg.id = l.group_id"
    )
}

const ROW_COLUMNS: &str = "uc.id, uc.user_id, uc.collectible_type, uc.photocard_id, \
     uc.lightstick_id, uc.source, uc.acquisition_date, uc.purchase_price, uc.quantity, \
     uc.photo, uc.is_duplicate, uc.created_at";

fn select() -> String {
    format!("{ROW_COLUMNS}, {DETAIL_COLUMNS}")
}

fn from(table: &str) -> String {
    format!("FROM {table} {}", detail_joins("uc"))
}

/// Provides per-user collection operations.
pub struct CollectibleRepo;

impl CollectibleRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact(
                "collectible_type",
                "uc.collectible_type",
                FieldKind::Choice(COLLECTIBLE_TYPES),
            ),
            FilterField::exact("source", "uc.source", FieldKind::Text),
            FilterField::year("acquisition_year", "uc.acquisition_date"),
            FilterField::after("acquisition_after", "uc.acquisition_date"),
            FilterField::before("acquisition_before", "uc.acquisition_date"),
            FilterField::min("min_price", "uc.purchase_price"),
            FilterField::max("max_price", "uc.purchase_price"),
        ],
        search: &["uc.source", "p.name", "l.name"],
        ordering: &[
            OrderField::new("acquisition_date", "uc.acquisition_date"),
            OrderField::new("created_at", "uc.created_at"),
            OrderField::new("purchase_price", "uc.purchase_price"),
        ],
        default_ordering: &[Ordering::desc("uc.acquisition_date")],
        tiebreaker: "uc.id",
    };

    /// Insert a collection entry for `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCollectible,
    ) -> Result<CollectibleRow, sqlx::Error> {
        let query = format!(
            "WITH uc AS (
                INSERT INTO user_collectibles
                    (user_id, collectible_type, photocard_id, lightstick_id, source,
                     acquisition_date, purchase_price, quantity, photo, is_duplicate)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
             )
             SELECT {} {}",
            select(),
            from("uc"),
        );
        sqlx::query_as::<_, CollectibleRow>(&query)
            .bind(user_id)
            .bind(input.item.kind().as_str())
            .bind(input.item.photocard_id())
            .bind(input.item.lightstick_id())
            .bind(&input.source)
            .bind(input.acquisition_date)
            .bind(input.purchase_price)
            .bind(input.quantity)
            .bind(&input.photo)
            .bind(input.is_duplicate)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by id regardless of owner; callers check `user_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CollectibleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {} {} WHERE uc.id = $1",
            select(),
            from("user_collectibles uc")
        );
        sqlx::query_as::<_, CollectibleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to an entry owned by `user_id`. Nullable
    /// columns are written when their outer `Option` is `Some`.
    ///
    /// Returns `None` if no such entry exists for that owner.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateCollectible,
    ) -> Result<Option<CollectibleRow>, sqlx::Error> {
        let query = format!(
            "WITH uc AS (
                UPDATE user_collectibles SET
                    collectible_type = $3,
                    photocard_id = $4,
                    lightstick_id = $5,
                    source = COALESCE($6, source),
                    acquisition_date = COALESCE($7, acquisition_date),
                    purchase_price = CASE WHEN $8 THEN $9 ELSE purchase_price END,
                    quantity = COALESCE($10, quantity),
                    photo = CASE WHEN $11 THEN $12 ELSE photo END,
                    is_duplicate = COALESCE($13, is_duplicate)
                WHERE id = $1 AND user_id = $2
                RETURNING *
             )
             SELECT {} {}",
            select(),
            from("uc"),
        );
        sqlx::query_as::<_, CollectibleRow>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.item.kind().as_str())
            .bind(input.item.photocard_id())
            .bind(input.item.lightstick_id())
            .bind(&input.source)
            .bind(input.acquisition_date)
            .bind(input.purchase_price.is_some())
            .bind(input.purchase_price.flatten())
            .bind(input.quantity)
            .bind(input.photo.is_some())
            .bind(input.photo.as_ref().and_then(Option::as_deref))
            .bind(input.is_duplicate)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_collectibles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of `user_id`'s collection.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        query: ListQuery,
    ) -> Result<Page<CollectibleRow>, sqlx::Error> {
        let query = query.scoped("uc.user_id", user_id);
        fetch_page(pool, &select(), &from("user_collectibles uc"), &query).await
    }

    /// Every entry of one type in `user_id`'s collection, default ordering.
    pub async fn list_by_type(
        pool: &PgPool,
        user_id: DbId,
        kind: CollectibleType,
    ) -> Result<Vec<CollectibleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {} {}
             WHERE uc.user_id = $1 AND uc.collectible_type = $2
             ORDER BY uc.acquisition_date DESC, uc.id",
            select(),
            from("user_collectibles uc"),
        );
        sqlx::query_as::<_, CollectibleRow>(&query)
            .bind(user_id)
            .bind(kind.as_str())
            .fetch_all(pool)
            .await
    }
}

//! Collection statistics queries.

use byeolpedia_core::stats::completion_percentage;
use byeolpedia_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::models::stats::{CollectionStats, CollectionTotals, GroupCompletion};

/// Per-type totals. Albums are distinct albums reached through owned
/// photocards; photocard and lightstick totals count rows, duplicates included.
const TOTALS_COLUMNS: &str = "\
    COUNT(DISTINCT av.album_id) AS total_albums, \
    COUNT(*) FILTER (WHERE uc.collectible_type = 'photocard') AS total_photocards, \
    COUNT(*) FILTER (WHERE uc.collectible_type = 'lightstick') AS total_lightsticks";

const TOTALS_FROM: &str = "\
    FROM user_collectibles uc \
    LEFT JOIN photocards p ON p.id = uc.photocard_id \
    LEFT JOIN album_versions av ON av.id = p.album_version_id \
    WHERE uc.user_id = $1";

#[derive(Debug, FromRow)]
struct SummaryRow {
    total_albums: i64,
    total_photocards: i64,
    total_lightsticks: i64,
    total_value: Decimal,
    duplicate_photocards: i64,
    duplicate_lightsticks: i64,
    wishlist_items: i64,
    favorite_groups: i64,
}

#[derive(Debug, FromRow)]
struct CompletionRow {
    group_id: DbId,
    group_name: String,
    total_photocards: i64,
    user_photocards: i64,
}

/// Provides read-only aggregates over a user's collection.
pub struct StatsRepo;

impl StatsRepo {
    /// Album, photocard and lightstick totals for the profile view.
    pub async fn totals(pool: &PgPool, user_id: DbId) -> Result<CollectionTotals, sqlx::Error> {
        let query = format!("SELECT {TOTALS_COLUMNS} {TOTALS_FROM}");
        sqlx::query_as::<_, CollectionTotals>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Full statistics snapshot.
    ///
    /// Runs in a single `REPEATABLE READ READ ONLY` transaction so the
    /// summary and the per-group completion see the same data.
    pub async fn collection_stats(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<CollectionStats, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let summary = Self::summary(&mut *tx, user_id).await?;
        let completion = Self::completion_by_group(&mut *tx, user_id).await?;
        tx.commit().await?;

        let mut total_value = summary.total_value;
        total_value.rescale(2);

        Ok(CollectionStats {
            total_albums: summary.total_albums,
            total_photocards: summary.total_photocards,
            total_lightsticks: summary.total_lightsticks,
            total_value,
            duplicate_photocards: summary.duplicate_photocards,
            duplicate_lightsticks: summary.duplicate_lightsticks,
            wishlist_items: summary.wishlist_items,
            favorite_groups: summary.favorite_groups,
            completion_by_group: completion,
        })
    }

    async fn summary(conn: &mut PgConnection, user_id: DbId) -> Result<SummaryRow, sqlx::Error> {
        let query = format!(
            "SELECT {TOTALS_COLUMNS},
                COALESCE(SUM(uc.purchase_price), 0) AS total_value,
                COUNT(*) FILTER (WHERE uc.is_duplicate AND uc.collectible_type = 'photocard')
                    AS duplicate_photocards,
                COUNT(*) FILTER (WHERE uc.is_duplicate AND uc.collectible_type = 'lightstick')
                    AS duplicate_lightsticks,
                (SELECT COUNT(*) FROM wishlist_items w WHERE w.user_id = $1) AS wishlist_items,
                (SELECT COUNT(*) FROM user_favorite_groups f WHERE f.user_id = $1)
                    AS favorite_groups
             {TOTALS_FROM}"
        );
        sqlx::query_as::<_, SummaryRow>(&query)
            .bind(user_id)
            .fetch_one(conn)
            .await
    }

    /// Completion for each favorite group; groups without catalog
    /// photocards are omitted.
    async fn completion_by_group(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<GroupCompletion>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CompletionRow>(
            "SELECT g.id AS group_id, g.name AS group_name,
                (SELECT COUNT(*) FROM photocards p WHERE p.group_id = g.id) AS total_photocards,
                (SELECT COUNT(*) FROM user_collectibles uc
                   JOIN photocards p ON p.id = uc.photocard_id
                  WHERE uc.user_id = $1 AND p.group_id = g.id) AS user_photocards
             FROM user_favorite_groups f
             JOIN groups g ON g.id = f.group_id
             WHERE f.user_id = $1
             ORDER BY g.name, g.id",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                completion_percentage(row.user_photocards, row.total_photocards).map(|pct| {
                    GroupCompletion {
                        group_id: row.group_id,
                        group_name: row.group_name,
                        total_photocards: row.total_photocards,
                        user_photocards: row.user_photocards,
                        completion_percentage: pct,
                    }
                })
            })
            .collect())
    }
}

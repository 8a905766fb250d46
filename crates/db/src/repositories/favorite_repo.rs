//! Repository for the `user_favorite_groups` table.

use byeolpedia_core::listing::{ListQuery, ListSpec, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, Page};
use crate::models::favorite::FavoriteGroupRow;

const SELECT: &str = "f.id, f.user_id, f.group_id, f.created_at, g.name AS group_name, \
     g.korean_name AS group_korean_name, g.debut_date AS group_debut_date, \
     g.agency AS group_agency, g.group_type, g.logo_image AS group_logo_image, \
     (SELECT COUNT(*) FROM members m WHERE m.group_id = g.id AND m.is_active) \
        AS group_member_count";

/// Provides per-user favorite group operations.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Favorites only paginate, newest first.
    pub const LIST: ListSpec = ListSpec {
        filters: &[],
        search: &[],
        ordering: &[],
        default_ordering: &[Ordering::desc("f.created_at")],
        tiebreaker: "f.id",
    };

    /// Mark `group_id` as a favorite of `user_id`.
    ///
    /// A repeated pair violates `uq_user_favorite_groups_user_group`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        group_id: DbId,
    ) -> Result<FavoriteGroupRow, sqlx::Error> {
        let query = format!(
            "WITH f AS (
                INSERT INTO user_favorite_groups (user_id, group_id)
                VALUES ($1, $2)
                RETURNING *
             )
             SELECT {SELECT} FROM f JOIN groups g ON g.id = f.group_id"
        );
        sqlx::query_as::<_, FavoriteGroupRow>(&query)
            .bind(user_id)
            .bind(group_id)
            .fetch_one(pool)
            .await
    }

    /// Find a favorite owned by `user_id`. Other users' favorites are
    /// indistinguishable from missing ones.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<FavoriteGroupRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SELECT} FROM user_favorite_groups f JOIN groups g ON g.id = f.group_id
             WHERE f.id = $1 AND f.user_id = $2"
        );
        sqlx::query_as::<_, FavoriteGroupRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_favorite_groups WHERE id = $1 AND user_id = $2")
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
    ) -> Result<Page<FavoriteGroupRow>, sqlx::Error> {
        let query = query.scoped("f.user_id", user_id);
        fetch_page(
            pool,
            SELECT,
            "FROM user_favorite_groups f JOIN groups g ON g.id = f.group_id",
            &query,
        )
        .await
    }
}

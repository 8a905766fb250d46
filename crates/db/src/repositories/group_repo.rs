//! Repository for the `groups` table.

use byeolpedia_core::catalog::GROUP_TYPES;
use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::listing::{fetch_page, Page};
use crate::models::group::{CreateGroup, Group, GroupDetail, GroupListItem};
use crate::repositories::MemberRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, korean_name, debut_date, agency, group_type, logo_image, created_at";

/// Columns for [`GroupListItem`], selected from `groups g`.
const LIST_COLUMNS: &str = "g.id, g.name, g.korean_name, g.debut_date, g.agency, g.group_type, \
     g.logo_image, \
     (SELECT COUNT(*) FROM members m WHERE m.group_id = g.id AND m.is_active) AS member_count";

const FROM: &str = "FROM groups g";

/// Provides catalog queries for groups.
pub struct GroupRepo;

impl GroupRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact("group_type", "g.group_type", FieldKind::Choice(GROUP_TYPES)),
            FilterField::exact("agency", "g.agency", FieldKind::Text),
            FilterField::year("debut_year", "g.debut_date"),
            FilterField::after("debut_after", "g.debut_date"),
            FilterField::before("debut_before", "g.debut_date"),
        ],
        search: &["g.name", "g.korean_name"],
        ordering: &[
            OrderField::new("name", "g.name"),
            OrderField::new("debut_date", "g.debut_date"),
        ],
        default_ordering: &[Ordering::asc("g.name")],
        tiebreaker: "g.id",
    };

    /// Insert a new group, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateGroup,
    ) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (name, korean_name, debut_date, agency, group_type, logo_image)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(&input.name)
            .bind(&input.korean_name)
            .bind(input.debut_date)
            .bind(&input.agency)
            .bind(&input.group_type)
            .bind(&input.logo_image)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a group by exact name.
    pub async fn find_by_name<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE name = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a group in its list shape (with active member count).
    pub async fn find_list_item(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GroupListItem>, sqlx::Error> {
        let query = format!("SELECT {LIST_COLUMNS} {FROM} WHERE g.id = $1");
        sqlx::query_as::<_, GroupListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a group with all of its members and its album count.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<GroupDetail>, sqlx::Error> {
        let Some(group) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let members = MemberRepo::list_for_group(pool, id).await?;
        let album_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM albums WHERE group_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(Some(GroupDetail {
            group,
            members,
            album_count,
        }))
    }

    /// List groups matching a parsed query, one page at a time.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Page<GroupListItem>, sqlx::Error> {
        fetch_page(pool, LIST_COLUMNS, FROM, query).await
    }

    /// Delete a group. Members, albums, photocards and lightsticks cascade,
    /// and so do collection rows that reference them.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM groups")
            .fetch_one(pool)
            .await
    }
}

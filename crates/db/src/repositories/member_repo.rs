//! Repository for the `members` table.

use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::listing::{fetch_page, Page};
use crate::models::member::{CreateMember, Member};

const COLUMNS: &str = "id, group_id, stage_name, real_name, birth_date, position, is_active, \
                       profile_image, created_at";

const LIST_COLUMNS: &str = "m.id, m.group_id, m.stage_name, m.real_name, m.birth_date, \
                            m.position, m.is_active, m.profile_image, m.created_at";

const FROM: &str = "FROM members m";

/// Provides catalog queries for group members.
pub struct MemberRepo;

impl MemberRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact("group", "m.group_id", FieldKind::Id),
            FilterField::exact("position", "m.position", FieldKind::Text),
            FilterField::exact("is_active", "m.is_active", FieldKind::Bool),
        ],
        search: &["m.stage_name", "m.real_name"],
        ordering: &[
            OrderField::new("stage_name", "m.stage_name"),
            OrderField::new("birth_date", "m.birth_date"),
        ],
        default_ordering: &[Ordering::asc("m.group_id"), Ordering::asc("m.stage_name")],
        tiebreaker: "m.id",
    };

    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (group_id, stage_name, real_name, birth_date, position, is_active, profile_image)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(input.group_id)
            .bind(&input.stage_name)
            .bind(&input.real_name)
            .bind(input.birth_date)
            .bind(&input.position)
            .bind(input.is_active)
            .bind(&input.profile_image)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// All members of a group, active or not, by stage name.
    pub async fn list_for_group(pool: &PgPool, group_id: DbId) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members WHERE group_id = $1 ORDER BY stage_name, id"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Page<Member>, sqlx::Error> {
        fetch_page(pool, LIST_COLUMNS, FROM, query).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(pool)
            .await
    }
}

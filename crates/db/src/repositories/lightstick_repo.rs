//! Repository for the `lightsticks` table.

use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::listing::{fetch_page, Page};
use crate::models::lightstick::{CreateLightstick, Lightstick, LightstickDetail, LightstickListItem};

const COLUMNS: &str = "id, group_id, name, version, image, release_date, created_at";

const LIST_COLUMNS: &str = "l.id, l.name, l.version, l.image, g.name AS group_name";

const DETAIL_COLUMNS: &str = "l.id, l.name, l.version, l.image, l.release_date, \
                              g.name AS group_name, l.group_id";

const FROM: &str = "FROM lightsticks l JOIN groups g ON g.id = l.group_id";

/// Provides catalog queries for lightsticks.
pub struct LightstickRepo;

impl LightstickRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact("group", "l.group_id", FieldKind::Id),
            FilterField::exact("version", "l.version", FieldKind::Text),
            FilterField::year("release_year", "l.release_date"),
            FilterField::after("release_after", "l.release_date"),
            FilterField::before("release_before", "l.release_date"),
        ],
        search: &["l.name", "g.name", "l.version"],
        ordering: &[
            OrderField::new("name", "l.name"),
            OrderField::new("release_date", "l.release_date"),
        ],
        default_ordering: &[Ordering::desc("l.release_date")],
        tiebreaker: "l.id",
    };

    pub const BY_GROUP: &'static str = "l.group_id";

    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateLightstick,
    ) -> Result<Lightstick, sqlx::Error> {
        let query = format!(
            "INSERT INTO lightsticks (group_id, name, version, image, release_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lightstick>(&query)
            .bind(input.group_id)
            .bind(&input.name)
            .bind(&input.version)
            .bind(&input.image)
            .bind(input.release_date)
            .fetch_one(executor)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lightsticks WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LightstickDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {FROM} WHERE l.id = $1");
        sqlx::query_as::<_, LightstickDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
    ) -> Result<Page<LightstickListItem>, sqlx::Error> {
        fetch_page(pool, LIST_COLUMNS, FROM, query).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lightsticks")
            .fetch_one(pool)
            .await
    }
}

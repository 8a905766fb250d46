//! Repository for the `photocards` table.

use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::listing::{fetch_page, Page};
use crate::models::photocard::{CreatePhotocard, Photocard, PhotocardDetail, PhotocardListItem};

const COLUMNS: &str = "id, group_id, album_version_id, member_id, name, image, release_date, \
                       photocard_type, created_at";

const LIST_COLUMNS: &str = "p.id, p.name, p.image, p.photocard_type, g.name AS group_name, \
                            m.stage_name AS member_name";

const DETAIL_COLUMNS: &str = "p.id, p.name, p.image, p.release_date, p.photocard_type, \
     g.name AS group_name, m.stage_name AS member_name, a.title AS album_name, \
     av.version_name, p.group_id, p.album_version_id, p.member_id";

/// `av` is joined so that album sub-listings can scope on `av.album_id`.
const FROM: &str = "FROM photocards p
     JOIN groups g ON g.id = p.group_id
     JOIN album_versions av ON av.id = p.album_version_id
     JOIN albums a ON a.id = av.album_id
     LEFT JOIN members m ON m.id = p.member_id";

/// Provides catalog queries for photocards.
pub struct PhotocardRepo;

impl PhotocardRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact("group", "p.group_id", FieldKind::Id),
            FilterField::exact("album_version", "p.album_version_id", FieldKind::Id),
            FilterField::exact("member", "p.member_id", FieldKind::Id),
            FilterField::exact("photocard_type", "p.photocard_type", FieldKind::Text),
            FilterField::year("release_year", "p.release_date"),
            FilterField::after("release_after", "p.release_date"),
            FilterField::before("release_before", "p.release_date"),
        ],
        search: &["p.name", "g.name", "m.stage_name"],
        ordering: &[
            OrderField::new("name", "p.name"),
            OrderField::new("release_date", "p.release_date"),
        ],
        default_ordering: &[Ordering::desc("p.release_date")],
        tiebreaker: "p.id",
    };

    /// Scoping columns for the group, member, album and album-version
    /// sub-listings.
    pub const BY_GROUP: &'static str = "p.group_id";
    pub const BY_MEMBER: &'static str = "p.member_id";
    pub const BY_ALBUM: &'static str = "av.album_id";
    pub const BY_ALBUM_VERSION: &'static str = "p.album_version_id";

    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreatePhotocard,
    ) -> Result<Photocard, sqlx::Error> {
        let query = format!(
            "INSERT INTO photocards
                (group_id, album_version_id, member_id, name, image, release_date, photocard_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photocard>(&query)
            .bind(input.group_id)
            .bind(input.album_version_id)
            .bind(input.member_id)
            .bind(&input.name)
            .bind(&input.image)
            .bind(input.release_date)
            .bind(&input.photocard_type)
            .fetch_one(executor)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM photocards WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PhotocardDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, PhotocardDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
    ) -> Result<Page<PhotocardListItem>, sqlx::Error> {
        fetch_page(pool, LIST_COLUMNS, FROM, query).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM photocards")
            .fetch_one(pool)
            .await
    }
}

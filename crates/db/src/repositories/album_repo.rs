//! Repository for the `albums` table.

use byeolpedia_core::catalog::ALBUM_TYPES;
use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::listing::{fetch_page, Page};
use crate::models::album::{Album, AlbumDetail, AlbumListItem, CreateAlbum};
use crate::repositories::{AlbumVersionRepo, GroupRepo};

const COLUMNS: &str = "id, group_id, title, release_date, album_type, cover_image, created_at";

const LIST_COLUMNS: &str = "a.id, a.title, a.release_date, a.album_type, a.cover_image, \
                            g.name AS group_name";

const FROM: &str = "FROM albums a JOIN groups g ON g.id = a.group_id";

/// Provides catalog queries for albums.
pub struct AlbumRepo;

impl AlbumRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[
            FilterField::exact("group", "a.group_id", FieldKind::Id),
            FilterField::exact("album_type", "a.album_type", FieldKind::Choice(ALBUM_TYPES)),
            FilterField::year("release_year", "a.release_date"),
            FilterField::after("release_after", "a.release_date"),
            FilterField::before("release_before", "a.release_date"),
        ],
        search: &["a.title", "g.name"],
        ordering: &[
            OrderField::new("title", "a.title"),
            OrderField::new("release_date", "a.release_date"),
        ],
        default_ordering: &[Ordering::desc("a.release_date")],
        tiebreaker: "a.id",
    };

    pub const BY_GROUP: &'static str = "a.group_id";

    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateAlbum,
    ) -> Result<Album, sqlx::Error> {
        let query = format!(
            "INSERT INTO albums (group_id, title, release_date, album_type, cover_image)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(input.group_id)
            .bind(&input.title)
            .bind(input.release_date)
            .bind(&input.album_type)
            .bind(&input.cover_image)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM albums WHERE id = $1");
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM albums WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Load an album with its group, versions and total photocard count.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<AlbumDetail>, sqlx::Error> {
        let Some(album) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let group = GroupRepo::find_list_item(pool, album.group_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let versions = AlbumVersionRepo::list_for_album(pool, id).await?;
        let total_photocards: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM photocards p
             JOIN album_versions av ON av.id = p.album_version_id
             WHERE av.album_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(Some(AlbumDetail {
            id: album.id,
            title: album.title,
            release_date: album.release_date,
            album_type: album.album_type,
            cover_image: album.cover_image,
            group,
            versions,
            total_photocards,
        }))
    }

    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Page<AlbumListItem>, sqlx::Error> {
        fetch_page(pool, LIST_COLUMNS, FROM, query).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM albums")
            .fetch_one(pool)
            .await
    }
}

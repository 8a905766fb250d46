//! Repository for the `album_versions` table.

use byeolpedia_core::listing::{FieldKind, FilterField, ListQuery, ListSpec, OrderField, Ordering};
use byeolpedia_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::listing::{fetch_page, Page};
use crate::models::album::{AlbumVersion, AlbumVersionItem, CreateAlbumVersion};

const COLUMNS: &str = "id, album_id, version_name, cover_image, number_of_photocards, created_at";

const ITEM_COLUMNS: &str = "av.id, av.album_id, av.version_name, av.cover_image, \
     av.number_of_photocards, \
     (SELECT COUNT(*) FROM photocards p WHERE p.album_version_id = av.id) AS photocards_count";

const FROM: &str = "FROM album_versions av";

/// Provides catalog queries for album versions.
pub struct AlbumVersionRepo;

impl AlbumVersionRepo {
    pub const LIST: ListSpec = ListSpec {
        filters: &[FilterField::exact("album", "av.album_id", FieldKind::Id)],
        search: &["av.version_name"],
        ordering: &[OrderField::new("version_name", "av.version_name")],
        default_ordering: &[Ordering::asc("av.album_id"), Ordering::asc("av.version_name")],
        tiebreaker: "av.id",
    };

    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateAlbumVersion,
    ) -> Result<AlbumVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO album_versions (album_id, version_name, cover_image, number_of_photocards)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlbumVersion>(&query)
            .bind(input.album_id)
            .bind(&input.version_name)
            .bind(&input.cover_image)
            .bind(input.number_of_photocards)
            .fetch_one(executor)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM album_versions WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a version with its catalog photocard count.
    pub async fn find_item(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AlbumVersionItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} {FROM} WHERE av.id = $1");
        sqlx::query_as::<_, AlbumVersionItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_album(
        pool: &PgPool,
        album_id: DbId,
    ) -> Result<Vec<AlbumVersionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} {FROM} WHERE av.album_id = $1 ORDER BY av.version_name, av.id"
        );
        sqlx::query_as::<_, AlbumVersionItem>(&query)
            .bind(album_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
    ) -> Result<Page<AlbumVersionItem>, sqlx::Error> {
        fetch_page(pool, ITEM_COLUMNS, FROM, query).await
    }
}

//! Insert validated fixtures into the catalog tables.

use byeolpedia_core::catalog::PHOTOCARD_TYPE_MEMBER;
use byeolpedia_core::error::CoreError;
use byeolpedia_db::models::album::{CreateAlbum, CreateAlbumVersion};
use byeolpedia_db::models::group::CreateGroup;
use byeolpedia_db::models::lightstick::CreateLightstick;
use byeolpedia_db::models::member::CreateMember;
use byeolpedia_db::models::photocard::CreatePhotocard;
use byeolpedia_db::repositories::{
    AlbumRepo, AlbumVersionRepo, GroupRepo, LightstickRepo, MemberRepo, PhotocardRepo,
};
use byeolpedia_db::DbPool;

use crate::fixture::{photocard_name, CatalogFixture, GroupFixture};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Invalid fixture for group '{group}': {source}")]
    InvalidGroup {
        group: String,
        #[source]
        source: CoreError,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Which fixture groups were inserted and which already existed.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Row counts across the catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub groups: i64,
    pub members: i64,
    pub albums: i64,
    pub photocards: i64,
    pub lightsticks: i64,
}

/// Validate every group, then insert those whose name is not yet taken.
///
/// Nothing is written if any group fails validation. Each inserted group,
/// with everything under it, is committed in its own transaction.
pub async fn seed_catalog(
    pool: &DbPool,
    fixture: &CatalogFixture,
) -> Result<SeedReport, SeedError> {
    for group in &fixture.groups {
        group.validate().map_err(|source| SeedError::InvalidGroup {
            group: group.name.clone(),
            source,
        })?;
    }

    let mut report = SeedReport::default();
    for group in &fixture.groups {
        if GroupRepo::find_by_name(pool, &group.name).await?.is_some() {
            tracing::info!(group = %group.name, "Group already exists, skipping");
            report.skipped.push(group.name.clone());
            continue;
        }
        insert_group(pool, group).await?;
        report.created.push(group.name.clone());
    }
    Ok(report)
}

async fn insert_group(pool: &DbPool, fixture: &GroupFixture) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let group = GroupRepo::create(
        &mut *tx,
        &CreateGroup {
            name: fixture.name.clone(),
            korean_name: fixture.korean_name.clone(),
            debut_date: fixture.debut_date,
            agency: fixture.agency.clone(),
            group_type: fixture.group_type.clone(),
            logo_image: fixture.logo_image.clone(),
        },
    )
    .await?;

    let mut members = Vec::with_capacity(fixture.members.len());
    for member in &fixture.members {
        let created = MemberRepo::create(
            &mut *tx,
            &CreateMember {
                group_id: group.id,
                stage_name: member.stage_name.clone(),
                real_name: member.real_name.clone(),
                birth_date: member.birth_date,
                position: member.position.clone(),
                is_active: member.is_active,
                profile_image: None,
            },
        )
        .await?;
        members.push(created);
    }

    let mut photocards = 0usize;
    for album in &fixture.albums {
        let created = AlbumRepo::create(
            &mut *tx,
            &CreateAlbum {
                group_id: group.id,
                title: album.title.clone(),
                release_date: album.release_date,
                album_type: album.album_type.clone(),
                cover_image: album.cover_image.clone(),
            },
        )
        .await?;

        for version_name in album.version_names() {
            let version = AlbumVersionRepo::create(
                &mut *tx,
                &CreateAlbumVersion {
                    album_id: created.id,
                    version_name: version_name.to_string(),
                    cover_image: None,
                    number_of_photocards: members.len() as i32,
                },
            )
            .await?;

            // One card per member per version.
            for member in &members {
                PhotocardRepo::create(
                    &mut *tx,
                    &CreatePhotocard {
                        group_id: group.id,
                        album_version_id: version.id,
                        member_id: Some(member.id),
                        name: photocard_name(&member.stage_name, &album.title, version_name),
                        image: None,
                        release_date: album.release_date,
                        photocard_type: PHOTOCARD_TYPE_MEMBER.to_string(),
                    },
                )
                .await?;
                photocards += 1;
            }
        }
    }

    for lightstick in &fixture.lightsticks {
        LightstickRepo::create(
            &mut *tx,
            &CreateLightstick {
                group_id: group.id,
                name: lightstick.name.clone(),
                version: lightstick.version.clone(),
                image: lightstick.image.clone(),
                release_date: lightstick.release_date,
            },
        )
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        group = %group.name,
        group_id = %group.id,
        members = members.len(),
        albums = fixture.albums.len(),
        photocards,
        lightsticks = fixture.lightsticks.len(),
        "Group created"
    );
    Ok(())
}

pub async fn catalog_counts(pool: &DbPool) -> Result<CatalogCounts, sqlx::Error> {
    Ok(CatalogCounts {
        groups: GroupRepo::count(pool).await?,
        members: MemberRepo::count(pool).await?,
        albums: AlbumRepo::count(pool).await?,
        photocards: PhotocardRepo::count(pool).await?,
        lightsticks: LightstickRepo::count(pool).await?,
    })
}

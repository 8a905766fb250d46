//! Integration tests for populating the catalog from fixtures.

use assert_matches::assert_matches;
use byeolpedia_seed::fixture::{CatalogFixture, DEFAULT_FIXTURE};
use byeolpedia_seed::loader::{catalog_counts, seed_catalog, SeedError};
use sqlx::PgPool;

fn bundled() -> CatalogFixture {
    CatalogFixture::parse(DEFAULT_FIXTURE).unwrap()
}

// ---------------------------------------------------------------------------
// Test: the bundled fixture seeds every group with its nested rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bundled_fixture_populates_catalog(pool: PgPool) {
    let fixture = bundled();
    let report = seed_catalog(&pool, &fixture).await.unwrap();

    assert_eq!(report.created.len(), fixture.groups.len());
    assert!(report.skipped.is_empty());

    let expected_cards: usize = fixture
        .groups
        .iter()
        .map(|g| {
            let versions: usize = g.albums.iter().map(|a| a.version_names().len()).sum();
            versions * g.members.len()
        })
        .sum();

    let counts = catalog_counts(&pool).await.unwrap();
    assert_eq!(counts.groups, fixture.groups.len() as i64);
    assert_eq!(
        counts.members,
        fixture.groups.iter().map(|g| g.members.len()).sum::<usize>() as i64
    );
    assert_eq!(
        counts.albums,
        fixture.groups.iter().map(|g| g.albums.len()).sum::<usize>() as i64
    );
    assert_eq!(counts.photocards, expected_cards as i64);
    assert_eq!(
        counts.lightsticks,
        fixture.groups.iter().map(|g| g.lightsticks.len()).sum::<usize>() as i64
    );
}

// ---------------------------------------------------------------------------
// Test: running twice skips groups that already exist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_run_skips_existing_groups(pool: PgPool) {
    let fixture = bundled();
    seed_catalog(&pool, &fixture).await.unwrap();
    let before = catalog_counts(&pool).await.unwrap();

    let report = seed_catalog(&pool, &fixture).await.unwrap();
    assert!(report.created.is_empty());
    assert_eq!(report.skipped.len(), fixture.groups.len());
    assert_eq!(catalog_counts(&pool).await.unwrap(), before);
}

// ---------------------------------------------------------------------------
// Test: one invalid group prevents any insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_group_rejects_whole_fixture(pool: PgPool) {
    let json = r#"{
        "groups": [
            {
                "name": "Valid Group",
                "korean_name": "그룹",
                "debut_date": "2020-01-01",
                "agency": "Agency",
                "group_type": "girl_group"
            },
            {
                "name": "Broken Group",
                "korean_name": "그룹",
                "debut_date": "2020-01-01",
                "agency": "Agency",
                "group_type": "orchestra"
            }
        ]
    }"#;
    let fixture = CatalogFixture::parse(json).unwrap();

    let err = seed_catalog(&pool, &fixture).await.unwrap_err();
    assert_matches!(err, SeedError::InvalidGroup { ref group, .. } if group == "Broken Group");

    let counts = catalog_counts(&pool).await.unwrap();
    assert_eq!(counts.groups, 0);
}

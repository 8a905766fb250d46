use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use byeolpedia_seed::fixture::{CatalogFixture, DEFAULT_FIXTURE};
use byeolpedia_seed::loader::{catalog_counts, seed_catalog};

/// `byeolpedia-seed [fixture.json]`
///
/// Loads the bundled catalog when no path is given.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "byeolpedia_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let json = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "Loading fixture");
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read fixture {path}"))?
        }
        None => {
            tracing::info!("Loading bundled fixture");
            DEFAULT_FIXTURE.to_string()
        }
    };
    let fixture = CatalogFixture::parse(&json).context("Fixture is not valid JSON")?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = byeolpedia_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    byeolpedia_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let report = seed_catalog(&pool, &fixture).await?;
    tracing::info!(
        created = report.created.len(),
        skipped = report.skipped.len(),
        "Catalog population finished"
    );

    let counts = catalog_counts(&pool).await?;
    tracing::info!(
        groups = counts.groups,
        members = counts.members,
        albums = counts.albums,
        photocards = counts.photocards,
        lightsticks = counts.lightsticks,
        collectibles = counts.photocards + counts.lightsticks,
        "Catalog totals"
    );

    Ok(())
}

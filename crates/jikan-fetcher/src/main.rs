//! Jikan fetcher CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use jikan_fetcher::{fetch_details, JikanClient, SeasonalCollector};
use shared::models::AnimeProjection;
use shared::{AnimeStore, Config};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Skip the database sink (file exports still run)
    #[arg(long)]
    skip_db: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "jikan-fetcher".to_string(),
        default_level: log_level,
        console: true,
        file: true,
        json_format: false,
    })?;

    info!("Jikan fetcher starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    // Prepare export directory
    let export_dir = config.export_dir();
    std::fs::create_dir_all(&export_dir)
        .with_context(|| format!("Failed to create export directory {}", export_dir.display()))?;

    // Initialize API client
    let mut client = JikanClient::new(
        config.fetcher.base_url.clone(),
        Duration::from_millis(config.fetcher.request_delay_ms),
    )
    .context("Failed to create Jikan client")?;

    let projection = AnimeProjection::from_name(&config.fetcher.projection);

    // Phase 1: collect seasonal listings
    info!(
        years = ?config.fetcher.years,
        seasons = ?config.fetcher.seasons,
        "Phase 1: Collecting seasonal anime"
    );
    let collector = SeasonalCollector::new(
        config.fetcher.years.clone(),
        config.fetcher.seasons.clone(),
        projection,
    );
    let season_set = collector.collect(&mut client).await;

    // Phase 2: fetch per-anime details
    let ids = season_set.anime_ids();
    info!(anime = ids.len(), "Phase 2: Fetching character and review data");
    let detail_set = fetch_details(&mut client, &ids).await;

    // Phase 3: file exports (unconditional overwrite)
    info!("Phase 3: Writing export files");
    shared::export::write_json_snapshot(export_dir.join(&config.export.anime_json), &season_set.raw)?;
    shared::export::write_anime_csv(
        export_dir.join(&config.export.anime_csv),
        &season_set.rows,
        projection,
    )?;
    shared::export::write_character_csv(
        export_dir.join(&config.export.character_csv),
        &detail_set.characters,
    )?;
    shared::export::write_voice_actor_csv(
        export_dir.join(&config.export.voice_actor_csv),
        &detail_set.voice_actors,
    )?;
    shared::export::write_review_csv(
        export_dir.join(&config.export.review_csv),
        &detail_set.reviews,
    )?;

    // Phase 4: durable storage with duplicate suppression
    if args.skip_db || !config.database.enabled {
        info!("Phase 4: Database sink disabled, skipping");
    } else {
        info!(table = %config.database.anime_table, "Phase 4: Upserting anime table");
        let table = config.database.anime_table.clone();
        let store = AnimeStore::new(config.database.clone());

        // A storage failure ends the run without this batch persisted;
        // re-running is safe because of the dedup check.
        match store.create_table(&table).await {
            Ok(()) => match store.upsert(&table, &season_set.rows).await {
                Ok(stats) => {
                    info!(
                        inserted = stats.inserted,
                        skipped_existing = stats.skipped_existing,
                        skipped_null_key = stats.skipped_null_key,
                        "Database upsert complete"
                    );
                }
                Err(e) => error!(error = %e, "Database upsert failed"),
            },
            Err(e) => error!(error = %e, "Table creation failed"),
        }
    }

    // Final statistics
    info!("=== Fetch Complete ===");
    info!("Partitions fetched: {}", season_set.partitions);
    info!("Truncated partitions: {}", season_set.truncated_partitions);
    info!("Anime collected: {}", season_set.rows.len());
    info!("Characters: {}", detail_set.characters.len());
    info!("Voice actors: {}", detail_set.voice_actors.len());
    info!("Reviews: {}", detail_set.reviews.len());
    info!(
        "Detail errors: {} character, {} review",
        detail_set.character_errors, detail_set.review_errors
    );

    info!("Jikan fetcher finished successfully");

    Ok(())
}

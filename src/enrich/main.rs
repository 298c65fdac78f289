//! Station enrichment CLI.
//!
//! Reads the prepared station CSV, queries the planning registry around every
//! station and writes one row per business destination area.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vlakken::config::{Config, FailurePolicy};
use vlakken::dataset::{load_stations, save_records, StationFilter};
use vlakken::models::Station;
use vlakken::pipeline::{EnrichOptions, Enricher};
use vlakken::registry::{CachedRegistry, PlanRegistry, RegistryClient, RetryingRegistry};

const DEFAULT_CONFIG: &str = "enrich.toml";

#[derive(Parser, Debug)]
#[command(name = "enrich")]
#[command(about = "Enrich substations with nearby zoning-plan areas")]
struct Args {
    /// TOML config file (defaults to ./enrich.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Station CSV to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Registry API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Registry base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Sample-point radius multiplier
    #[arg(long)]
    radius: Option<f64>,

    /// Only process the first N stations
    #[arg(long)]
    limit: Option<usize>,

    /// What to do when a station fails: skip_station or abort
    #[arg(long)]
    on_station_error: Option<FailurePolicy>,

    /// Attempts per registry request
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Reuse plan searches for identical sample points within this run
    #[arg(long)]
    cache_queries: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Vlakken station enrichment");

    let config = load_config(&args)?;
    config.validate()?;

    let api_key = config
        .registry
        .api_key
        .clone()
        .context("No API key: pass --api-key, set API_KEY or registry.api_key")?;

    let filter = StationFilter {
        min_feed_in: config.dataset.min_feed_in,
        min_offtake: config.dataset.min_offtake,
    };
    let stations = load_stations(&config.dataset.input, &filter)
        .with_context(|| format!("Failed to load {}", config.dataset.input.display()))?;

    let client = RegistryClient::new(&config.registry, api_key)?;
    let registry = RetryingRegistry::new(client, config.retry.policy());

    let options = EnrichOptions {
        radius: config.enrich.radius,
        limit: config.enrich.limit,
        on_station_error: config.enrich.on_station_error,
    };

    if config.enrich.cache_queries {
        let cached = CachedRegistry::new(registry);
        run(&cached, options, &stations, &config.dataset.output).await?;
        info!("Plan search cache held {} points", cached.cache_size());
    } else {
        run(&registry, options, &stations, &config.dataset.output).await?;
    }

    Ok(())
}

/// File config (if any) with command-line overrides applied.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load_from_file(DEFAULT_CONFIG)?,
        None => Config::default(),
    };

    if let Some(input) = &args.input {
        config.dataset.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.dataset.output = output.clone();
    }
    if let Some(key) = &args.api_key {
        config.registry.api_key = Some(key.clone());
    }
    if let Some(url) = &args.base_url {
        config.registry.base_url = url.clone();
    }
    if let Some(radius) = args.radius {
        config.enrich.radius = radius;
    }
    if args.limit.is_some() {
        config.enrich.limit = args.limit;
    }
    if let Some(policy) = args.on_station_error {
        config.enrich.on_station_error = policy;
    }
    if let Some(attempts) = args.max_attempts {
        config.retry.max_attempts = attempts;
    }
    if args.cache_queries {
        config.enrich.cache_queries = true;
    }

    Ok(config)
}

async fn run<R: PlanRegistry>(
    registry: R,
    options: EnrichOptions,
    stations: &[Station],
    output: &Path,
) -> Result<()> {
    let pb = ProgressBar::new(stations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let enricher = Enricher::new(registry, options).with_progress(pb);
    let report = enricher
        .enrich(stations)
        .await
        .context("Enrichment aborted")?;

    for skipped in &report.skipped_stations {
        warn!(
            "Skipped {} ({}): {}",
            skipped.name, skipped.zip_code, skipped.reason
        );
    }

    save_records(output, &report.records)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Done: {} records from {} stations ({} skipped, {} polygons unusable)",
        report.records.len(),
        report.stations_processed,
        report.skipped_stations.len(),
        report.skipped_polygons
    );

    Ok(())
}

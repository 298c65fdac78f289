use indicatif::ProgressBar;
use tracing::{debug, error, info, warn};

use super::{fetch_areas, resolve_plans};
use crate::config::FailurePolicy;
use crate::error::Result;
use crate::geometry::{area_and_centroid, generate_points, haversine_distance};
use crate::models::{DestinationArea, EnrichedRecord, GeoPoint, Station};
use crate::registry::PlanRegistry;

/// Knobs for one enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Multiplier for the sample-point offsets
    pub radius: f64,
    /// Process at most this many stations
    pub limit: Option<usize>,
    pub on_station_error: FailurePolicy,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            limit: None,
            on_station_error: FailurePolicy::SkipStation,
        }
    }
}

/// A station whose rows were dropped because a step failed.
#[derive(Debug, Clone)]
pub struct SkippedStation {
    pub name: String,
    pub zip_code: String,
    pub reason: String,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct EnrichReport {
    /// In order: station, then plan, then polygon
    pub records: Vec<EnrichedRecord>,
    pub stations_processed: usize,
    pub skipped_stations: Vec<SkippedStation>,
    pub skipped_polygons: usize,
}

struct StationOutcome {
    records: Vec<EnrichedRecord>,
    skipped_polygons: usize,
}

/// Drives the pipeline station by station against a [`PlanRegistry`].
pub struct Enricher<R> {
    registry: R,
    options: EnrichOptions,
    progress: ProgressBar,
}

impl<R: PlanRegistry> Enricher<R> {
    pub fn new(registry: R, options: EnrichOptions) -> Self {
        Self {
            registry,
            options,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report station progress on `progress` (its length is set by `enrich`).
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Enrich `stations` sequentially.
    ///
    /// Under [`FailurePolicy::SkipStation`] a failing station contributes no
    /// rows and the run continues; under [`FailurePolicy::Abort`] the first
    /// station error is returned.
    pub async fn enrich(&self, stations: &[Station]) -> Result<EnrichReport> {
        let total = self
            .options
            .limit
            .map_or(stations.len(), |limit| limit.min(stations.len()));
        self.progress.set_length(total as u64);

        let mut report = EnrichReport::default();

        for (i, station) in stations.iter().take(total).enumerate() {
            debug!("Station {} of {}: {}", i + 1, total, station.name);
            self.progress.set_message(station.name.clone());

            match self.enrich_station(station).await {
                Ok(outcome) => {
                    report.records.extend(outcome.records);
                    report.skipped_polygons += outcome.skipped_polygons;
                }
                Err(e) => match self.options.on_station_error {
                    FailurePolicy::Abort => {
                        error!("Station {} failed, aborting: {}", station.name, e);
                        self.progress.abandon();
                        return Err(e);
                    }
                    FailurePolicy::SkipStation => {
                        warn!("Skipping station {}: {}", station.name, e);
                        report.skipped_stations.push(SkippedStation {
                            name: station.name.clone(),
                            zip_code: station.zip_code.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
            }

            report.stations_processed += 1;
            self.progress.inc(1);
        }

        self.progress.finish_with_message("Enrichment complete");
        info!(
            "Enriched {} stations: {} records, {} stations skipped, {} polygons skipped",
            report.stations_processed,
            report.records.len(),
            report.skipped_stations.len(),
            report.skipped_polygons
        );

        Ok(report)
    }

    /// All rows of one station, or the first error.
    ///
    /// A failed area fetch for any plan fails the whole station, so rows of
    /// plans fetched before it are discarded too.
    async fn enrich_station(&self, station: &Station) -> Result<StationOutcome> {
        let origin = station.location()?;
        let points = generate_points(station, self.options.radius)?;
        let plans = resolve_plans(&self.registry, &points).await?;
        debug!("{}: {} plans", station.name, plans.len());

        let mut outcome = StationOutcome {
            records: Vec::new(),
            skipped_polygons: 0,
        };

        for (j, plan) in plans.iter().enumerate() {
            debug!("Plan {} of {}: {} ({})", j + 1, plans.len(), plan.naam, plan.id);
            let areas = fetch_areas(&self.registry, &plan.id).await?;

            for area in &areas {
                match enrich_area(station, origin, area) {
                    Ok(record) => outcome.records.push(record),
                    Err(e) => {
                        warn!(
                            "Skipping area {} of plan {}: {}",
                            area.label(),
                            plan.id,
                            e
                        );
                        outcome.skipped_polygons += 1;
                    }
                }
            }
        }

        Ok(outcome)
    }
}

/// Build the output row for one destination area of `station`.
pub fn enrich_area(
    station: &Station,
    origin: GeoPoint,
    area: &DestinationArea,
) -> Result<EnrichedRecord> {
    let ring = area.outer_ring()?;
    let (area_m2, centroid) = area_and_centroid(&ring)?;
    let distance_m = haversine_distance(origin.lon, origin.lat, centroid.lon, centroid.lat);

    Ok(EnrichedRecord {
        zip_code: station.zip_code.clone(),
        name: station.name.clone(),
        capacity_feed_in_mva: station.capacity_feed_in_mva,
        capacity_offtake_mva: station.capacity_offtake_mva,
        station_lat: origin.lat,
        station_lon: origin.lon,
        centroid_lat: centroid.lat,
        centroid_lon: centroid.lon,
        area_m2,
        distance_m,
    })
}

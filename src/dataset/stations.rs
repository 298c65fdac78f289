use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::Station;

/// Raw row of the capacity CSV. Capacities stay text so unparsable values
/// can be coerced to missing instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(default)]
    zip_code: String,
    #[serde(default)]
    station: String,
    #[serde(default, rename = "beschikbare_capaciteit_invoeding_huidig_mva")]
    feed_in: String,
    #[serde(default, rename = "beschikbare_capaciteit_afname_huidig_mva")]
    offtake: String,
    geometry: String,
}

/// Capacity thresholds a station must exceed to be enriched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationFilter {
    pub min_feed_in: f64,
    pub min_offtake: f64,
}

impl Default for StationFilter {
    fn default() -> Self {
        Self {
            min_feed_in: 0.0,
            min_offtake: 0.0,
        }
    }
}

impl StationFilter {
    /// Both capacities must be present and strictly above their minimum.
    pub fn accepts(&self, station: &Station) -> bool {
        matches!(station.capacity_feed_in_mva, Some(v) if v > self.min_feed_in)
            && matches!(station.capacity_offtake_mva, Some(v) if v > self.min_offtake)
    }
}

fn coerce_capacity(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read stations from any CSV source.
pub fn read_stations<R: Read>(reader: R, filter: &StationFilter) -> Result<Vec<Station>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut stations = Vec::new();
    let mut dropped = 0usize;

    for result in csv_reader.deserialize::<StationRow>() {
        let row = result?;
        let station = Station {
            zip_code: row.zip_code,
            name: row.station,
            capacity_feed_in_mva: coerce_capacity(&row.feed_in),
            capacity_offtake_mva: coerce_capacity(&row.offtake),
            geometry: row.geometry,
        };

        if filter.accepts(&station) {
            stations.push(station);
        } else {
            debug!("Dropping station {:?}: capacity below threshold", station.name);
            dropped += 1;
        }
    }

    info!(
        "Loaded {} stations ({} dropped by capacity filter)",
        stations.len(),
        dropped
    );
    Ok(stations)
}

/// Read stations from a CSV file on disk.
pub fn load_stations<P: AsRef<Path>>(path: P, filter: &StationFilter) -> Result<Vec<Station>> {
    let path = path.as_ref();
    info!("Loading stations from {}", path.display());
    let file = File::open(path)?;
    read_stations(file, filter)
}

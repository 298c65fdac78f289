//! One output row per (station, destination area) pair.

use serde::Serialize;

/// Column order of the output dataset.
///
/// Must match the serde names of [`EnrichedRecord`] in field order.
pub const RECORD_COLUMNS: [&str; 10] = [
    "zip_code",
    "name",
    "beschikbare_capaciteit_invoeding_huidig_mva",
    "beschikbare_capaciteit_afname_huidig_mva",
    "station_lat",
    "station_long",
    "center_vlak_lat",
    "center_vlak_long",
    "area_vlak",
    "distance_to_station",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub zip_code: String,
    pub name: String,
    #[serde(rename = "beschikbare_capaciteit_invoeding_huidig_mva")]
    pub capacity_feed_in_mva: Option<f64>,
    #[serde(rename = "beschikbare_capaciteit_afname_huidig_mva")]
    pub capacity_offtake_mva: Option<f64>,
    pub station_lat: f64,
    #[serde(rename = "station_long")]
    pub station_lon: f64,
    #[serde(rename = "center_vlak_lat")]
    pub centroid_lat: f64,
    #[serde(rename = "center_vlak_long")]
    pub centroid_lon: f64,
    /// Square metres, cylindrical equal-area projection
    #[serde(rename = "area_vlak")]
    pub area_m2: f64,
    /// Metres, great-circle
    #[serde(rename = "distance_to_station")]
    pub distance_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_match_serialized_header() {
        let record = EnrichedRecord {
            zip_code: "2511 CV".into(),
            name: "Den Haag Centrum".into(),
            capacity_feed_in_mva: None,
            capacity_offtake_mva: Some(3.0),
            station_lat: 52.08,
            station_lon: 4.31,
            centroid_lat: 52.081,
            centroid_lon: 4.312,
            area_m2: 980.0,
            distance_m: 150.0,
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().next().unwrap(), RECORD_COLUMNS.join(","));
    }
}

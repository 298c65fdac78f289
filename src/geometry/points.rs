use crate::error::{EnrichError, Result};
use crate::models::{Direction, GeoPoint, SamplePoint, Station};

/// Longitude step per unit radius
pub const EAST_WEST_STEP_DEG: f64 = 0.01;
/// Latitude step per unit radius. Smaller than the longitude step so the
/// ring is roughly circular at Dutch latitudes.
pub const NORTH_SOUTH_STEP_DEG: f64 = 0.006;

/// Parse coordinate text of the form `"(lon lat)"`.
///
/// A leading `POINT` keyword is tolerated so raw WKT works too.
pub fn parse_coordinate(text: &str) -> Result<GeoPoint> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("POINT")
        .or_else(|| trimmed.strip_prefix("point"))
        .unwrap_or(trimmed);
    let cleaned = body.replace(['(', ')'], " ");

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let [lon_str, lat_str] = tokens.as_slice() else {
        return Err(EnrichError::malformed(
            text,
            format!("expected 2 tokens, found {}", tokens.len()),
        ));
    };

    let lon: f64 = lon_str
        .parse()
        .map_err(|_| EnrichError::malformed(text, format!("longitude {:?} is not a number", lon_str)))?;
    let lat: f64 = lat_str
        .parse()
        .map_err(|_| EnrichError::malformed(text, format!("latitude {:?} is not a number", lat_str)))?;

    if !lon.is_finite() || !lat.is_finite() {
        return Err(EnrichError::malformed(text, "coordinate is not finite"));
    }

    Ok(GeoPoint::new(lon, lat))
}

/// The five query points around `center`: center, east, north, west, south.
pub fn ring_around(center: GeoPoint, radius: f64) -> [SamplePoint; 5] {
    Direction::ALL.map(|direction| {
        let (dx, dy) = direction.unit_offset();
        SamplePoint {
            direction,
            point: GeoPoint::new(
                center.lon + dx * radius * EAST_WEST_STEP_DEG,
                center.lat + dy * radius * NORTH_SOUTH_STEP_DEG,
            ),
        }
    })
}

/// Sample points for a station, parsed from its coordinate text.
pub fn generate_points(station: &Station, radius: f64) -> Result<[SamplePoint; 5]> {
    let center = station.location()?;
    Ok(ring_around(center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn station(geometry: &str) -> Station {
        Station {
            zip_code: "1012 AB".into(),
            name: "Amsterdam Centrum".into(),
            capacity_feed_in_mva: Some(12.0),
            capacity_offtake_mva: Some(8.5),
            geometry: geometry.into(),
        }
    }

    #[test]
    fn test_parse_coordinate() {
        let p = parse_coordinate("(4.895 52.37)").unwrap();
        assert_eq!(p, GeoPoint::new(4.895, 52.37));
    }

    #[test]
    fn test_parse_coordinate_tolerates_wkt_prefix_and_spacing() {
        let p = parse_coordinate("POINT (5.1  52.09)").unwrap();
        assert_eq!(p, GeoPoint::new(5.1, 52.09));
    }

    #[test]
    fn test_parse_coordinate_rejects_wrong_token_count() {
        for bad in ["(4.895)", "(4.895 52.37 0)", "()", ""] {
            assert!(
                matches!(
                    parse_coordinate(bad),
                    Err(EnrichError::MalformedCoordinate { .. })
                ),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_coordinate_rejects_non_numeric() {
        assert!(matches!(
            parse_coordinate("(abc 52.37)"),
            Err(EnrichError::MalformedCoordinate { .. })
        ));
        assert!(matches!(
            parse_coordinate("(4.8 NaN)"),
            Err(EnrichError::MalformedCoordinate { .. })
        ));
    }

    #[test]
    fn test_generate_points_layout() {
        let points = generate_points(&station("(4.895 52.370)"), 1.0).unwrap();
        assert_eq!(points.len(), 5);

        let center = points[0].point;
        assert_eq!(points[0].direction, Direction::Center);
        assert_eq!(center, GeoPoint::new(4.895, 52.370));

        assert_abs_diff_eq!(points[1].point.lon, 4.905, epsilon = 1e-12);
        assert_eq!(points[1].point.lat, center.lat);

        assert_eq!(points[2].point.lon, center.lon);
        assert_abs_diff_eq!(points[2].point.lat, 52.376, epsilon = 1e-12);

        assert_abs_diff_eq!(points[3].point.lon, 4.885, epsilon = 1e-12);
        assert_eq!(points[3].point.lat, center.lat);

        assert_eq!(points[4].point.lon, center.lon);
        assert_abs_diff_eq!(points[4].point.lat, 52.364, epsilon = 1e-12);
    }

    #[test]
    fn test_radius_scales_offsets() {
        let center = GeoPoint::new(6.0, 53.0);
        let points = ring_around(center, 2.5);
        assert_abs_diff_eq!(points[1].point.lon - center.lon, 0.025, epsilon = 1e-12);
        assert_abs_diff_eq!(points[2].point.lat - center.lat, 0.015, epsilon = 1e-12);
        assert_abs_diff_eq!(center.lon - points[3].point.lon, 0.025, epsilon = 1e-12);
        assert_abs_diff_eq!(center.lat - points[4].point.lat, 0.015, epsilon = 1e-12);
    }

    #[test]
    fn test_generate_points_propagates_malformed_coordinate() {
        assert!(matches!(
            generate_points(&station("4.895;52.370"), 1.0),
            Err(EnrichError::MalformedCoordinate { .. })
        ));
    }
}

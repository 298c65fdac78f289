/// Mean Earth radius used for great-circle distances (metres)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres between two lon/lat points (degrees).
pub fn haversine_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1, lon2, lat2) = (
        lon1.to_radians(),
        lat1.to_radians(),
        lon2.to_radians(),
        lat2.to_radians(),
    );

    let dlon = lon2 - lon1;
    let dlat = lat2 - lat1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp guards asin against rounding just above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    c * EARTH_RADIUS_M
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_distance(4.895, 52.37, 4.895, 52.37), 0.0);
        assert_eq!(haversine_distance(-70.0, -33.4, -70.0, -33.4), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = haversine_distance(4.629148, 51.904796, 4.616423, 51.895380);
        let ba = haversine_distance(4.616423, 51.895380, 4.629148, 51.904796);
        assert_relative_eq!(ab, ba, max_relative = 1e-12);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_distance(5.0, 52.0, 5.0, 53.0);
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert_relative_eq!(d, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_amsterdam_to_rotterdam() {
        // Dam square to Rotterdam Centraal, roughly 57 km
        let d = haversine_distance(4.8932, 52.3731, 4.4690, 51.9244);
        assert!((56_000.0..59_000.0).contains(&d), "got {}", d);
    }

    #[test]
    fn test_antipodes() {
        let d = haversine_distance(0.0, 0.0, 180.0, 0.0);
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_M, max_relative = 1e-12);
    }
}

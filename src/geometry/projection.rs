use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Centroid, Coord, Line, LineString, MapCoords, Polygon};
use hashbrown::HashSet;

use crate::error::{EnrichError, Result};
use crate::models::GeoPoint;

/// GRS80 ellipsoid (ETRS89 / EPSG:4258)
const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
const INVERSE_FLATTENING: f64 = 298.257_222_101;

fn eccentricity_squared() -> f64 {
    let f = 1.0 / INVERSE_FLATTENING;
    f * (2.0 - f)
}

/// Authalic `q` term of the ellipsoidal cylindrical equal-area projection
fn authalic_q(sin_phi: f64, e2: f64) -> f64 {
    let e = e2.sqrt();
    let e_sin = e * sin_phi;
    (1.0 - e2)
        * (sin_phi / (1.0 - e2 * sin_phi * sin_phi)
            - (1.0 / (2.0 * e)) * ((1.0 - e_sin) / (1.0 + e_sin)).ln())
}

/// Project a lon/lat coordinate (degrees) onto the cylindrical equal-area
/// projection with standard parallel 0 (`+proj=cea`), in metres.
pub fn project_cea(coord: Coord<f64>) -> Coord<f64> {
    let e2 = eccentricity_squared();
    let lambda = coord.x.to_radians();
    let phi = coord.y.to_radians();
    Coord {
        x: SEMI_MAJOR_AXIS_M * lambda,
        y: SEMI_MAJOR_AXIS_M * authalic_q(phi.sin(), e2) / 2.0,
    }
}

/// Area (m², equal-area projection) and centroid (lon/lat) of a ring.
///
/// The ring may be open or closed. Rings with fewer than 3 distinct vertices,
/// coordinates outside lon/lat bounds, self-intersections or zero area are
/// rejected with [`EnrichError::InvalidGeometry`].
pub fn area_and_centroid(ring: &[Coord<f64>]) -> Result<(f64, GeoPoint)> {
    let ring = normalize_ring(ring)?;
    check_simple(&ring)?;

    let polygon = Polygon::new(LineString::new(ring), vec![]);

    // Centroid is taken in the geographic CRS, area after reprojection
    let centroid = polygon
        .centroid()
        .ok_or_else(|| EnrichError::geometry("polygon has no centroid"))?;
    let area = polygon.map_coords(project_cea).unsigned_area();

    if !area.is_finite() || area <= 0.0 {
        return Err(EnrichError::geometry(format!("degenerate area {}", area)));
    }

    Ok((area, GeoPoint::new(centroid.x(), centroid.y())))
}

/// Drop repeated consecutive vertices and close the ring.
fn normalize_ring(ring: &[Coord<f64>]) -> Result<Vec<Coord<f64>>> {
    for c in ring {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(EnrichError::geometry("non-finite coordinate"));
        }
        if c.x.abs() > 180.0 || c.y.abs() > 90.0 {
            return Err(EnrichError::geometry(format!(
                "coordinate ({}, {}) outside lon/lat bounds",
                c.x, c.y
            )));
        }
    }

    let mut open: Vec<Coord<f64>> = Vec::with_capacity(ring.len() + 1);
    for c in ring {
        if open.last() != Some(c) {
            open.push(*c);
        }
    }
    while open.len() > 1 && open.first() == open.last() {
        open.pop();
    }

    let distinct: HashSet<(u64, u64)> = open
        .iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    if distinct.len() < 3 {
        return Err(EnrichError::geometry(format!(
            "ring has {} distinct vertices",
            distinct.len()
        )));
    }

    open.push(open[0]);
    Ok(open)
}

/// Reject rings whose edges cross or overlap.
fn check_simple(closed: &[Coord<f64>]) -> Result<()> {
    let edges: Vec<Line<f64>> = closed.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let n = edges.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(LineIntersection::Collinear { intersection })
                    if adjacent && intersection.start == intersection.end => {}
                Some(_) => {
                    return Err(EnrichError::geometry(format!(
                        "ring self-intersects between edges {} and {}",
                        i, j
                    )))
                }
            }
        }
    }
    Ok(())
}

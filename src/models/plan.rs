//! Zoning plans and their destination areas as returned by the registry.

use geo::Coord;
use serde::Deserialize;

use crate::error::{EnrichError, Result};

/// A zoning plan (bestemmingsplan).
///
/// Equality covers all three fields, so two entries with the same `id` but a
/// different `naam` are distinct plans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Plan {
    pub id: String,
    pub naam: String,
    /// Umbrella plans (parapluplannen) are overlays, not discrete zoning
    #[serde(rename = "isParapluplan")]
    pub is_parapluplan: bool,
}

/// A zoned polygon (bestemmingsvlak) within a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationArea {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub naam: Option<String>,
    #[serde(default)]
    pub geometrie: Option<AreaGeometry>,
}

/// GeoJSON-style geometry; coordinates are kept raw until a ring is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaGeometry {
    #[serde(rename = "type")]
    pub geo_type: String,
    pub coordinates: serde_json::Value,
}

impl DestinationArea {
    /// Label for log lines
    pub fn label(&self) -> &str {
        self.naam
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// Outer ring of the area's polygon.
    ///
    /// For a `MultiPolygon` the first polygon's outer ring is used.
    pub fn outer_ring(&self) -> Result<Vec<Coord<f64>>> {
        let geometry = self
            .geometrie
            .as_ref()
            .ok_or_else(|| EnrichError::geometry("area has no geometry"))?;

        let ring = match geometry.geo_type.as_str() {
            "Polygon" => geometry.coordinates.get(0),
            "MultiPolygon" => geometry.coordinates.get(0).and_then(|p| p.get(0)),
            other => {
                return Err(EnrichError::geometry(format!(
                    "unsupported geometry type {}",
                    other
                )))
            }
        }
        .ok_or_else(|| EnrichError::geometry("polygon has no outer ring"))?;

        let positions: Vec<Vec<f64>> = serde_json::from_value(ring.clone())
            .map_err(|e| EnrichError::geometry(format!("unreadable ring: {}", e)))?;

        positions
            .into_iter()
            .map(|pos| match pos.as_slice() {
                [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                _ => Err(EnrichError::geometry("position with fewer than 2 values")),
            })
            .collect()
    }
}

use tracing::debug;

use crate::error::{EnrichError, Result};
use crate::models::DestinationArea;
use crate::registry::PlanRegistry;

/// Business destination areas of one plan, first page only.
///
/// Geometry is not validated here.
pub async fn fetch_areas<R: PlanRegistry>(
    registry: &R,
    plan_id: &str,
) -> Result<Vec<DestinationArea>> {
    let areas = registry
        .fetch_areas(plan_id)
        .await
        .map_err(|source| EnrichError::AreaFetchFailed {
            plan_id: plan_id.to_string(),
            source,
        })?;
    debug!("Plan {}: {} destination areas", plan_id, areas.len());
    Ok(areas)
}

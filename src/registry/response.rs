//! HAL+JSON response bodies of the registry.

use serde::Deserialize;

use crate::error::RegistryError;
use crate::models::{DestinationArea, Plan};

#[derive(Debug, Deserialize)]
struct PlanSearchResponse {
    #[serde(rename = "_embedded")]
    embedded: PlanSearchEmbedded,
}

#[derive(Debug, Deserialize)]
struct PlanSearchEmbedded {
    plannen: Vec<Plan>,
}

#[derive(Debug, Deserialize)]
struct AreaResponse {
    #[serde(rename = "_embedded")]
    embedded: AreaEmbedded,
}

#[derive(Debug, Deserialize)]
struct AreaEmbedded {
    bestemmingsvlakken: Vec<DestinationArea>,
}

/// Plans embedded in a `/plannen/_zoek` response.
pub fn parse_plan_search(body: &str) -> Result<Vec<Plan>, RegistryError> {
    let response: PlanSearchResponse = serde_json::from_str(body)?;
    Ok(response.embedded.plannen)
}

/// Areas embedded in a `/plannen/{id}/bestemmingsvlakken` response.
pub fn parse_destination_areas(body: &str) -> Result<Vec<DestinationArea>, RegistryError> {
    let response: AreaResponse = serde_json::from_str(body)?;
    Ok(response.embedded.bestemmingsvlakken)
}

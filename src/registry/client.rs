//! HTTP client for the Ruimtelijke Plannen "opvragen" API (v4).

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::response::{parse_destination_areas, parse_plan_search};
use super::PlanRegistry;
use crate::config::RegistrySettings;
use crate::error::{EnrichError, RegistryError};
use crate::models::{DestinationArea, GeoPoint, Plan};

pub const DEFAULT_BASE_URL: &str =
    "https://ruimte.omgevingswet.overheid.nl/ruimtelijke-plannen/api/opvragen/v4";

const HAL_JSON: &str = "application/hal+json";
/// ETRS89, the CRS the registry serves geometry in
const CRS: &str = "epsg:4258";
const MUNICIPAL_AUTHORITY: &str = "gemeentelijke overheid";

/// Talks to the registry over HTTPS, one request at a time.
pub struct RegistryClient {
    client: Client,
    base_url: Url,
    api_key: String,
    page_size: u32,
}

impl RegistryClient {
    pub fn new(settings: &RegistrySettings, api_key: String) -> Result<Self, EnrichError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            EnrichError::Config(format!("invalid base url {:?}: {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(EnrichError::Config(format!(
                "base url {:?} cannot take path segments",
                settings.base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("vlakken/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| EnrichError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            page_size: settings.page_size,
        })
    }

    /// `{base}/{segments...}?{params}`
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    fn page_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", "1".to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }

    fn search_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.page_params();
        params.extend([
            (
                "beleidsmatigVerantwoordelijkeOverheid.type",
                MUNICIPAL_AUTHORITY.to_string(),
            ),
            ("publicerendBevoegdGezag.type", MUNICIPAL_AUTHORITY.to_string()),
            ("planType", "bestemmingsplan".to_string()),
            ("regelStatus", "geldend".to_string()),
        ]);
        params
    }

    fn area_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.page_params();
        params.extend([
            ("bestemmingshoofdgroep", "bedrijf".to_string()),
            ("expand", "geometrie".to_string()),
        ]);
        params
    }
}

/// Turn a non-2xx answer into an error, keeping the body for diagnostics.
async fn check_status(response: Response) -> Result<Response, RegistryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RegistryError::Status {
        status: status.as_u16(),
        body,
    })
}

impl PlanRegistry for RegistryClient {
    async fn search_plans(&self, point: GeoPoint) -> Result<Vec<Plan>, RegistryError> {
        let url = self.endpoint(&["plannen", "_zoek"], &self.search_params());
        let body = json!({
            "_geo": {
                "contains": {
                    "type": "Point",
                    "coordinates": [point.lon, point.lat]
                }
            }
        });

        debug!("POST {} at ({}, {})", url, point.lon, point.lat);

        let response = self
            .client
            .post(url)
            .header("accept", HAL_JSON)
            .header("Content-Crs", CRS)
            .header("Accept-Crs", CRS)
            .header("X-Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let text = check_status(response).await?.text().await?;
        parse_plan_search(&text)
    }

    async fn fetch_areas(&self, plan_id: &str) -> Result<Vec<DestinationArea>, RegistryError> {
        let url = self.endpoint(
            &["plannen", plan_id, "bestemmingsvlakken"],
            &self.area_params(),
        );

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("accept", HAL_JSON)
            .header("Accept-Crs", CRS)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let text = check_status(response).await?.text().await?;
        parse_destination_areas(&text)
    }
}

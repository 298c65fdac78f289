//! Access to the Ruimtelijke Plannen registry.
//!
//! [`PlanRegistry`] is the seam the pipeline talks to. [`RegistryClient`] is
//! the HTTP implementation; [`RetryingRegistry`] and [`CachedRegistry`] wrap
//! any registry with a retry policy or a per-run search cache.

mod cache;
mod client;
mod response;
mod retry;

pub use cache::CachedRegistry;
pub use client::{RegistryClient, DEFAULT_BASE_URL};
pub use response::{parse_destination_areas, parse_plan_search};
pub use retry::{RetryPolicy, RetryingRegistry};

use crate::error::RegistryError;
use crate::models::{DestinationArea, GeoPoint, Plan};

/// Planning registry operations used by the pipeline.
#[allow(async_fn_in_trait)]
pub trait PlanRegistry {
    /// Zoning plans whose geometry contains `point` (first page only).
    async fn search_plans(&self, point: GeoPoint) -> Result<Vec<Plan>, RegistryError>;

    /// Business destination areas of a plan (first page only).
    async fn fetch_areas(&self, plan_id: &str) -> Result<Vec<DestinationArea>, RegistryError>;
}

impl<R: PlanRegistry> PlanRegistry for &R {
    async fn search_plans(&self, point: GeoPoint) -> Result<Vec<Plan>, RegistryError> {
        (**self).search_plans(point).await
    }

    async fn fetch_areas(&self, plan_id: &str) -> Result<Vec<DestinationArea>, RegistryError> {
        (**self).fetch_areas(plan_id).await
    }
}

use std::sync::Mutex;

use hashbrown::HashMap;
use tracing::debug;

use super::PlanRegistry;
use crate::error::RegistryError;
use crate::models::{DestinationArea, GeoPoint, Plan};

/// Memoizes plan searches by exact query point for the lifetime of one run.
///
/// Neighbouring stations can produce identical sample points; those share a
/// single request. Area fetches and failed searches are never cached.
pub struct CachedRegistry<R> {
    inner: R,
    /// (lon bits, lat bits) → plans
    searches: Mutex<HashMap<(u64, u64), Vec<Plan>>>,
}

impl<R: PlanRegistry> CachedRegistry<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            searches: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached search results
    pub fn cache_size(&self) -> usize {
        self.searches.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn key(point: GeoPoint) -> (u64, u64) {
        (point.lon.to_bits(), point.lat.to_bits())
    }
}

impl<R: PlanRegistry> PlanRegistry for CachedRegistry<R> {
    async fn search_plans(&self, point: GeoPoint) -> Result<Vec<Plan>, RegistryError> {
        let key = Self::key(point);

        let cached = self
            .searches
            .lock()
            .ok()
            .and_then(|m| m.get(&key).cloned());
        if let Some(plans) = cached {
            debug!("Cache hit for plan search at ({}, {})", point.lon, point.lat);
            return Ok(plans);
        }

        let plans = self.inner.search_plans(point).await?;
        if let Ok(mut m) = self.searches.lock() {
            m.insert(key, plans.clone());
        }
        Ok(plans)
    }

    async fn fetch_areas(&self, plan_id: &str) -> Result<Vec<DestinationArea>, RegistryError> {
        self.inner.fetch_areas(plan_id).await
    }
}

//! Station enrichment: sample points → plans → destination areas → records.

mod areas;
mod enrich;
mod resolver;

pub use areas::fetch_areas;
pub use enrich::{enrich_area, EnrichOptions, EnrichReport, Enricher, SkippedStation};
pub use resolver::{filter_unique_plans, resolve_plans};

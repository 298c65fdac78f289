//! Core data models for the enrichment pipeline.

pub mod plan;
pub mod record;
pub mod station;

pub use plan::{AreaGeometry, DestinationArea, Plan};
pub use record::{EnrichedRecord, RECORD_COLUMNS};
pub use station::{Direction, GeoPoint, SamplePoint, Station};

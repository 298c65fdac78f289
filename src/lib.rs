//! Vlakken - enriches electricity substations with nearby zoning-plan areas
//!
//! For each station a ring of sample points is queried against the Ruimtelijke
//! Plannen registry; the business destination areas of every plan found are
//! reduced to area, centroid and distance to the station.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod models;
pub mod pipeline;
pub mod registry;

pub use error::{EnrichError, RegistryError};
pub use models::{DestinationArea, EnrichedRecord, GeoPoint, Plan, SamplePoint, Station};

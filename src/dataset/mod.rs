//! CSV input (stations) and output (enriched records).

mod output;
mod stations;

pub use output::{save_records, write_records};
pub use stations::{load_stations, read_stations, StationFilter};

//! Pure geometry helpers: sample-point rings, equal-area polygon metrics and
//! great-circle distance.
//!
//! Nothing in here touches the network.

mod distance;
mod points;
mod projection;

pub use distance::{haversine_distance, EARTH_RADIUS_M};
pub use points::{
    generate_points, parse_coordinate, ring_around, EAST_WEST_STEP_DEG, NORTH_SOUTH_STEP_DEG,
};
pub use projection::{area_and_centroid, project_cea};

//! Substation and sample-point types.

use crate::error::Result;
use crate::geometry::parse_coordinate;

/// Geographic point (lon/lat, EPSG:4258)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Which way a sample point is offset from the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Center,
    East,
    North,
    West,
    South,
}

impl Direction {
    /// All directions in query order (center first).
    pub const ALL: [Direction; 5] = [
        Direction::Center,
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// Unit offset as (lon factor, lat factor)
    pub fn unit_offset(&self) -> (f64, f64) {
        match self {
            Direction::Center => (0.0, 0.0),
            Direction::East => (1.0, 0.0),
            Direction::North => (0.0, 1.0),
            Direction::West => (-1.0, 0.0),
            Direction::South => (0.0, -1.0),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Center => write!(f, "center"),
            Direction::East => write!(f, "east"),
            Direction::North => write!(f, "north"),
            Direction::West => write!(f, "west"),
            Direction::South => write!(f, "south"),
        }
    }
}

/// A query point around a station
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub direction: Direction,
    pub point: GeoPoint,
}

/// A substation row from the capacity dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub zip_code: String,
    pub name: String,
    /// Available feed-in capacity (MVA)
    pub capacity_feed_in_mva: Option<f64>,
    /// Available offtake capacity (MVA)
    pub capacity_offtake_mva: Option<f64>,
    /// Location as coordinate text, e.g. `"(4.895 52.370)"`
    pub geometry: String,
}

impl Station {
    /// Parse the station's coordinate text.
    pub fn location(&self) -> Result<GeoPoint> {
        parse_coordinate(&self.geometry)
    }
}

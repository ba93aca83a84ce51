use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Cartesian position in the local tangent plane, meters, relative to a
/// trajectory-specific origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise offset from `other` to `self`.
    pub fn delta_from(&self, other: &Position3) -> (f64, f64, f64) {
        (self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// One time-stamped point of a projected flight trajectory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: NaiveDateTime,
    pub position: Position3,
}

impl TrackPoint {
    pub fn new(timestamp: NaiveDateTime, position: Position3) -> Self {
        Self {
            timestamp,
            position,
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Observer-relative pointing sample emitted by the angularizer.
///
/// `azimuth_deg` is continuous (unwrapped) and therefore unbounded;
/// `elevation_deg` stays within [-90, 90].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AngularSample {
    pub timestamp: NaiveDateTime,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl AngularSample {
    pub fn new(timestamp: NaiveDateTime, azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            timestamp,
            azimuth_deg,
            elevation_deg,
        }
    }
}

/// Per-trajectory diagnostics accumulated while angularizing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Timestamps that went backwards relative to their predecessor.
    pub out_of_order: usize,
    /// Samples with the target directly above or below the observer, where
    /// the bearing fell back to the previous value.
    pub degenerate: usize,
}

/// Angle sequence for one trajectory together with its diagnostics.
#[derive(Debug, Clone, Default)]
pub struct AngleSeries {
    pub samples: Vec<AngularSample>,
    pub stats: SeriesStats,
}

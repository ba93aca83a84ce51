use chrono::NaiveDateTime;

use crate::angles::unwrap::{AngleUnwrapper, UnwrapState};
use crate::telemetry::log::LogManager;
use crate::track::{AngleSeries, AngularSample, Position3, SeriesStats, TrackPoint};

/// Drives the unwrapper over one ordered trajectory.
pub struct TrajectoryAngularizer {
    unwrapper: AngleUnwrapper,
    logger: LogManager,
}

impl TrajectoryAngularizer {
    pub fn new(observer: Position3) -> Self {
        Self {
            unwrapper: AngleUnwrapper::new(observer),
            logger: LogManager::new(),
        }
    }

    pub fn observer(&self) -> Position3 {
        self.unwrapper.observer()
    }

    /// Emits one angular sample per input point, in input order, from a fresh
    /// unwrap state. The input is assumed pre-sorted by timestamp; a
    /// non-monotonic timestamp is counted and reported, never re-sorted.
    pub fn angularize(&self, points: &[TrackPoint]) -> AngleSeries {
        let mut state = UnwrapState::new();
        let mut samples = Vec::with_capacity(points.len());
        let mut stats = SeriesStats::default();
        let mut previous_timestamp: Option<NaiveDateTime> = None;

        for point in points {
            if let Some(previous) = previous_timestamp {
                if point.timestamp < previous {
                    stats.out_of_order += 1;
                    self.logger.warn(&format!(
                        "out-of-order timestamp {} after {}",
                        point.timestamp, previous
                    ));
                }
            }
            previous_timestamp = Some(point.timestamp);

            let angles = self.unwrapper.compute(point.position, &mut state);
            if angles.degenerate {
                stats.degenerate += 1;
            }
            samples.push(AngularSample::new(
                point.timestamp,
                angles.azimuth_deg,
                angles.elevation_deg,
            ));
        }

        AngleSeries { samples, stats }
    }
}

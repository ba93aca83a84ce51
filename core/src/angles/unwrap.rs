use crate::track::Position3;

/// Azimuth continuity state for one trajectory.
///
/// Created fresh at the start of a trajectory, mutated once per sample in
/// temporal order, discarded at trajectory end. Reusing it across
/// trajectories corrupts the revolution count, so the angularizer never does.
#[derive(Debug, Clone, Default)]
pub struct UnwrapState {
    previous_raw: Option<f64>,
    revolutions: i64,
}

impl UnwrapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole revolutions accumulated so far; negative for clockwise wraps.
    pub fn revolutions(&self) -> i64 {
        self.revolutions
    }
}

/// Angles for a single target position.
#[derive(Debug, Clone, Copy)]
pub struct PointAngles {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Set when the target sat directly above or below the observer and the
    /// bearing fell back to the previous raw azimuth.
    pub degenerate: bool,
}

/// Converts target positions into continuous observer-relative angles.
///
/// Raw azimuth is `90° − atan2(dy, dx)`, the compass convention with north
/// along +Y and bearings increasing clockwise, which lands in [-90°, 270°).
/// The wrap detector assumes at most one 360° crossing between consecutive
/// samples; sparse sampling of a fast-spinning target defeats it.
pub struct AngleUnwrapper {
    observer: Position3,
}

impl AngleUnwrapper {
    pub fn new(observer: Position3) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> Position3 {
        self.observer
    }

    /// Computes the unwrapped azimuth and the elevation for one target,
    /// advancing `state`.
    pub fn compute(&self, target: Position3, state: &mut UnwrapState) -> PointAngles {
        let (dx, dy, dz) = target.delta_from(&self.observer);

        let (raw, degenerate) = if dx == 0.0 && dy == 0.0 {
            // Bearing undefined; hold the previous raw azimuth instead of
            // letting NaN reach the dataset.
            (state.previous_raw.unwrap_or(0.0), true)
        } else {
            (90.0 - dy.atan2(dx).to_degrees(), false)
        };

        match state.previous_raw {
            None => {
                state.previous_raw = Some(raw);
            }
            Some(previous) => {
                let delta = raw - previous;
                if delta > 180.0 {
                    state.revolutions -= 1;
                } else if delta < -180.0 {
                    state.revolutions += 1;
                }
                state.previous_raw = Some(raw);
            }
        }

        PointAngles {
            azimuth_deg: raw + state.revolutions as f64 * 360.0,
            elevation_deg: dz.atan2(dx.hypot(dy)).to_degrees(),
            degenerate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observer() -> Position3 {
        Position3::new(0.0, 0.0, -1.0)
    }

    /// Position whose bearing from the observer is the given compass angle,
    /// at zero elevation.
    fn target_at_bearing(bearing_deg: f64) -> Position3 {
        let radians = bearing_deg.to_radians();
        Position3::new(radians.sin(), radians.cos(), -1.0)
    }

    #[test]
    fn compass_convention_matches_worked_example() {
        let unwrapper = AngleUnwrapper::new(observer());
        let mut state = UnwrapState::new();

        let north = unwrapper.compute(Position3::new(0.0, 1.0, -1.0), &mut state);
        assert!((north.azimuth_deg - 0.0).abs() < 1e-12);
        assert!((north.elevation_deg - 0.0).abs() < 1e-12);

        let east = unwrapper.compute(Position3::new(1.0, 0.0, -1.0), &mut state);
        assert!((east.azimuth_deg - 90.0).abs() < 1e-12);
        assert!((east.elevation_deg - 0.0).abs() < 1e-12);
    }

    #[test]
    fn sustained_rotation_recovers_true_angle() {
        let unwrapper = AngleUnwrapper::new(observer());
        let mut state = UnwrapState::new();

        let mut previous = None;
        for step in 0..=20 {
            let true_bearing = step as f64 * 45.0;
            let angles = unwrapper.compute(target_at_bearing(true_bearing), &mut state);
            assert!(
                (angles.azimuth_deg - true_bearing).abs() < 1e-9,
                "step {}: got {}",
                step,
                angles.azimuth_deg
            );
            if let Some(previous) = previous {
                let jump: f64 = angles.azimuth_deg - previous;
                assert!(jump.abs() < 180.0);
            }
            previous = Some(angles.azimuth_deg);
        }
        // 900° of rotation crosses the raw range twice.
        assert_eq!(state.revolutions(), 2);
    }

    #[test]
    fn oscillation_across_wrap_stays_continuous() {
        let unwrapper = AngleUnwrapper::new(observer());
        let mut state = UnwrapState::new();

        let bearings = [265.0, 275.0, 265.0, 275.0];
        let mut outputs = Vec::new();
        for &bearing in &bearings {
            outputs.push(unwrapper.compute(target_at_bearing(bearing), &mut state));
        }

        for (angles, &expected) in outputs.iter().zip(bearings.iter()) {
            assert!((angles.azimuth_deg - expected).abs() < 1e-9);
        }
        for pair in outputs.windows(2) {
            assert!((pair[1].azimuth_deg - pair[0].azimuth_deg).abs() < 180.0);
        }
    }

    #[test]
    fn elevation_stays_bounded() {
        let unwrapper = AngleUnwrapper::new(observer());
        let mut state = UnwrapState::new();

        let targets = [
            Position3::new(0.0, 0.0, 5.0),
            Position3::new(0.0, 0.0, -7.0),
            Position3::new(3.0, -2.0, 1.5),
            Position3::new(-1.0, 4.0, -3.0),
        ];
        for target in targets {
            let angles = unwrapper.compute(target, &mut state);
            assert!(angles.elevation_deg >= -90.0 && angles.elevation_deg <= 90.0);
            assert!(angles.elevation_deg.is_finite());
        }
    }

    #[test]
    fn degenerate_geometry_reuses_previous_bearing() {
        let unwrapper = AngleUnwrapper::new(observer());
        let mut state = UnwrapState::new();

        let first = unwrapper.compute(target_at_bearing(45.0), &mut state);
        assert!(!first.degenerate);

        let overhead = unwrapper.compute(Position3::new(0.0, 0.0, 9.0), &mut state);
        assert!(overhead.degenerate);
        assert!((overhead.azimuth_deg - first.azimuth_deg).abs() < 1e-12);
        assert!((overhead.elevation_deg - 90.0).abs() < 1e-12);
        assert!(overhead.azimuth_deg.is_finite());
    }

    #[test]
    fn degenerate_first_sample_defaults_to_zero() {
        let unwrapper = AngleUnwrapper::new(observer());
        let mut state = UnwrapState::new();

        let angles = unwrapper.compute(Position3::new(0.0, 0.0, 4.0), &mut state);
        assert!(angles.degenerate);
        assert_eq!(angles.azimuth_deg, 0.0);
    }
}

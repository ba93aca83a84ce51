use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use trackcore::track::{Position3, TrackPoint};

/// Configuration for generating synthetic orbit trajectories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub samples: usize,
    pub radius_m: f64,
    pub revolutions: f64,
    pub climb_m: f64,
    pub jitter_m: f64,
    pub sample_interval_ms: i64,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            samples: 200,
            radius_m: 50.0,
            revolutions: 1.5,
            climb_m: 20.0,
            jitter_m: 0.05,
            sample_interval_ms: 100,
            seed: 0,
            description: None,
        }
    }
}

fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Builds a circular, slowly climbing trajectory around `center`. The
/// bearing from `center` advances linearly, so the unwrapped azimuth of the
/// result is a near-perfect ramp; useful for demos and workflow tests.
pub fn build_orbit_track(config: &OrbitConfig, center: Position3) -> Vec<TrackPoint> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = start_time();
    let count = config.samples;
    let mut points = Vec::with_capacity(count);

    for index in 0..count {
        let fraction = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            0.0
        };
        let angle = fraction * config.revolutions * std::f64::consts::TAU;
        let mut jitter = || {
            if config.jitter_m > 0.0 {
                rng.gen_range(-config.jitter_m..config.jitter_m)
            } else {
                0.0
            }
        };
        let position = Position3::new(
            center.x + config.radius_m * angle.sin() + jitter(),
            center.y + config.radius_m * angle.cos() + jitter(),
            center.z + config.climb_m * fraction + jitter(),
        );
        let timestamp = start + Duration::milliseconds(index as i64 * config.sample_interval_ms);
        points.push(TrackPoint::new(timestamp, position));
    }

    points
}

pub fn build_demo_track(samples: usize, seed: u64, center: Position3) -> Vec<TrackPoint> {
    let config = OrbitConfig {
        samples,
        seed,
        ..Default::default()
    };
    build_orbit_track(&config, center)
}

use trackcore::track::{Position3, TrackPoint};

use crate::ingest::srt::GeoSample;

/// Meters per degree of latitude; the longitude scale shrinks with
/// cos(latitude) at the trajectory origin.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Projects geodetic samples onto a local tangent plane anchored at the first
/// sample. Equirectangular approximation: adequate for the short spans of a
/// single flight, with no accuracy guarantee beyond that.
pub fn project_to_local(samples: &[GeoSample]) -> Vec<TrackPoint> {
    let origin = match samples.first() {
        Some(origin) => *origin,
        None => return Vec::new(),
    };
    let longitude_scale = METERS_PER_DEGREE * origin.latitude_deg.to_radians().cos();

    samples
        .iter()
        .map(|sample| {
            TrackPoint::new(
                sample.timestamp,
                Position3::new(
                    (sample.longitude_deg - origin.longitude_deg) * longitude_scale,
                    (sample.latitude_deg - origin.latitude_deg) * METERS_PER_DEGREE,
                    sample.altitude_m - origin.altitude_m,
                ),
            )
        })
        .collect()
}

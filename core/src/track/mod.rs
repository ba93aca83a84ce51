pub mod point;
pub mod sample;

pub use point::{Position3, TrackPoint};
pub use sample::{AngleSeries, AngularSample, SeriesStats};

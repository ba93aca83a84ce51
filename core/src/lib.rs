//! Angle-conversion and dataset-windowing core for the flight-track pointing
//! platform.
//!
//! The modules turn projected flight trajectories into continuous
//! observer-relative pointing angles and slice those sequences into
//! supervised-learning window/label pairs, with telemetry shared by the
//! batch driver.

pub mod angles;
pub mod dataset;
pub mod math;
pub mod prelude;
pub mod telemetry;
pub mod track;

pub use prelude::{PipelineError, PipelineResult, WindowParams};

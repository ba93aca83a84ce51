pub mod trajectory;
pub mod unwrap;

pub use trajectory::TrajectoryAngularizer;
pub use unwrap::{AngleUnwrapper, PointAngles, UnwrapState};

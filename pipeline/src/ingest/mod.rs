pub mod project;
pub mod srt;

pub use project::project_to_local;
pub use srt::{parse_srt, GeoSample};

pub mod noise;
pub mod window;

pub use noise::{GaussianNoise, NoiseSource};
pub use window::{WindowDatasetBuilder, WindowRecords};

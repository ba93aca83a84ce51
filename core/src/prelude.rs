use serde::{Deserialize, Serialize};

/// Shared parameters for the dataset windowing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowParams {
    /// Samples per input window (A).
    pub window_len: usize,
    /// Samples between the end of a window and its label (B).
    pub horizon: usize,
    /// Start-index advance between consecutive windows; 1 reuses every
    /// sample, `window_len` produces non-overlapping blocks.
    pub stride: usize,
    pub azimuth_noise_stddev: f64,
    pub elevation_noise_stddev: f64,
    pub compress_duplicates: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            window_len: 25,
            horizon: 1,
            stride: 1,
            azimuth_noise_stddev: 0.0,
            elevation_noise_stddev: 0.0,
            compress_duplicates: false,
        }
    }
}

/// Common error type for pipeline execution.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("malformed record: {0}")]
    Parse(String),
    #[error("out-of-order timestamp: {0}")]
    OutOfOrder(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

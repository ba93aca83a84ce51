use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trackcore::prelude::WindowParams;
use trackcore::track::Position3;

/// Run configuration. YAML keys keep the legacy names as aliases, so configs
/// written for the original tooling still load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of raw flight logs.
    pub raw_dir: PathBuf,
    /// Directory receiving the xyz/angle/dataset artifacts.
    pub data_dir: PathBuf,
    /// Regenerate artifacts even when up to date.
    pub overwrite: bool,
    #[serde(alias = "compress_data")]
    pub compress_duplicates: bool,
    #[serde(alias = "azimuth_noise_covariance")]
    pub azimuth_noise_stddev: f64,
    #[serde(alias = "elevation_noise_covariance")]
    pub elevation_noise_stddev: f64,
    /// Input window length (A).
    #[serde(alias = "A")]
    pub window_len: usize,
    /// Prediction horizon (B).
    #[serde(alias = "B")]
    pub horizon: usize,
    /// Window start advance; 1 overlaps maximally, `window_len` gives
    /// disjoint blocks.
    pub stride: usize,
    /// Fixed observer position in the local tangent plane.
    pub observer: Position3,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("raw_file"),
            data_dir: PathBuf::from("local_file"),
            overwrite: false,
            compress_duplicates: false,
            azimuth_noise_stddev: 0.0,
            elevation_noise_stddev: 0.0,
            window_len: 25,
            horizon: 1,
            stride: 1,
            observer: Position3::new(0.0, 0.0, -1.0),
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading pipeline config {}", path_ref.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing pipeline config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn to_window_params(&self) -> WindowParams {
        WindowParams {
            window_len: self.window_len,
            horizon: self.horizon,
            stride: self.stride,
            azimuth_noise_stddev: self.azimuth_noise_stddev,
            elevation_noise_stddev: self.elevation_noise_stddev,
            compress_duplicates: self.compress_duplicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_documented_fallbacks() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_len, 25);
        assert_eq!(config.horizon, 1);
        assert_eq!(config.stride, 1);
        assert!(!config.overwrite);
        assert_eq!(config.observer, Position3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn config_load_reads_yaml_with_legacy_keys() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"overwrite: true\ncompress_data: true\nA: 10\nB: 2\nazimuth_noise_covariance: 0.5\nelevation_noise_covariance: 0.25\n",
        )
        .unwrap();
        let path = temp.into_temp_path();

        let config = PipelineConfig::load(&path).unwrap();
        assert!(config.overwrite);
        assert!(config.compress_duplicates);
        assert_eq!(config.window_len, 10);
        assert_eq!(config.horizon, 2);
        assert_eq!(config.azimuth_noise_stddev, 0.5);
        assert_eq!(config.elevation_noise_stddev, 0.25);
    }

    #[test]
    fn window_params_mirror_the_config() {
        let mut config = PipelineConfig::default();
        config.window_len = 8;
        config.stride = 8;
        config.compress_duplicates = true;

        let params = config.to_window_params();
        assert_eq!(params.window_len, 8);
        assert_eq!(params.stride, 8);
        assert!(params.compress_duplicates);
    }
}

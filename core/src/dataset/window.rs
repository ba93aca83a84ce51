use ndarray::Array2;

use crate::dataset::noise::NoiseSource;
use crate::prelude::{PipelineError, PipelineResult, WindowParams};
use crate::telemetry::log::LogManager;
use crate::track::AngularSample;

/// Aligned window/label matrices for one trajectory.
///
/// Row `i` of `inputs` holds the perturbed azimuths of one window followed by
/// its perturbed elevations (2A values); row `i` of `outputs` holds the clean
/// (azimuth, elevation) pair `A + B` retained samples past the window start.
/// Both matrices always have the same row count.
#[derive(Debug, Clone)]
pub struct WindowRecords {
    pub inputs: Array2<f64>,
    pub outputs: Array2<f64>,
}

impl WindowRecords {
    fn empty(window_len: usize) -> Self {
        Self {
            inputs: Array2::zeros((0, 2 * window_len)),
            outputs: Array2::zeros((0, 2)),
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }
}

/// Slices an angle sequence into noise-perturbed input windows paired with
/// clean future labels.
pub struct WindowDatasetBuilder {
    params: WindowParams,
    logger: LogManager,
}

impl WindowDatasetBuilder {
    pub fn new(params: WindowParams) -> PipelineResult<Self> {
        if params.window_len == 0 {
            return Err(PipelineError::InvalidParams(
                "window_len must be positive".into(),
            ));
        }
        if params.stride == 0 {
            return Err(PipelineError::InvalidParams("stride must be positive".into()));
        }
        for (name, stddev) in [
            ("azimuth", params.azimuth_noise_stddev),
            ("elevation", params.elevation_noise_stddev),
        ] {
            if !stddev.is_finite() || stddev < 0.0 {
                return Err(PipelineError::InvalidParams(format!(
                    "{} noise stddev {} out of range",
                    name, stddev
                )));
            }
        }
        Ok(Self {
            params,
            logger: LogManager::new(),
        })
    }

    pub fn params(&self) -> &WindowParams {
        &self.params
    }

    /// Builds the window/label matrices. A trajectory shorter than
    /// `window_len + horizon + 1` retained samples yields an empty result,
    /// not an error.
    pub fn build(&self, samples: &[AngularSample], noise: &mut dyn NoiseSource) -> WindowRecords {
        let window_len = self.params.window_len;
        let horizon = self.params.horizon;

        let retained = if self.params.compress_duplicates {
            compress_duplicates(samples)
        } else {
            samples
                .iter()
                .map(|sample| (sample.azimuth_deg, sample.elevation_deg))
                .collect()
        };

        if retained.len() <= window_len + horizon {
            self.logger.record(&format!(
                "trajectory too short to window: {} retained samples, need more than {}",
                retained.len(),
                window_len + horizon
            ));
            return WindowRecords::empty(window_len);
        }

        // Perturbed copy feeds the inputs; the clean sequence feeds labels.
        let perturbed: Vec<(f64, f64)> = retained
            .iter()
            .map(|&(azimuth, elevation)| {
                (
                    noise.sample(azimuth, self.params.azimuth_noise_stddev),
                    noise.sample(elevation, self.params.elevation_noise_stddev),
                )
            })
            .collect();

        let starts: Vec<usize> = (0..)
            .map(|index| index * self.params.stride)
            .take_while(|&start| start + window_len + horizon < retained.len())
            .collect();

        let mut inputs = Array2::zeros((starts.len(), 2 * window_len));
        let mut outputs = Array2::zeros((starts.len(), 2));

        for (row, &start) in starts.iter().enumerate() {
            for offset in 0..window_len {
                inputs[[row, offset]] = perturbed[start + offset].0;
                inputs[[row, window_len + offset]] = perturbed[start + offset].1;
            }
            let (azimuth, elevation) = retained[start + window_len + horizon];
            outputs[[row, 0]] = azimuth;
            outputs[[row, 1]] = elevation;
        }

        WindowRecords { inputs, outputs }
    }
}

/// Collapses runs of identical (azimuth, elevation) pairs, keeping the first
/// occurrence and discarding the duplicates' timestamps. Adjacent-only: equal
/// pairs separated by other values are both retained.
fn compress_duplicates(samples: &[AngularSample]) -> Vec<(f64, f64)> {
    let mut retained: Vec<(f64, f64)> = Vec::with_capacity(samples.len());
    for sample in samples {
        let pair = (sample.azimuth_deg, sample.elevation_deg);
        if retained.last() != Some(&pair) {
            retained.push(pair);
        }
    }
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::noise::GaussianNoise;
    use chrono::{NaiveDate, NaiveDateTime};

    fn timestamp(seconds: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, seconds)
            .unwrap()
    }

    fn ramp_series(count: u32) -> Vec<AngularSample> {
        (0..count)
            .map(|step| AngularSample::new(timestamp(step), step as f64, 10.0 + step as f64))
            .collect()
    }

    fn params(window_len: usize, horizon: usize) -> WindowParams {
        WindowParams {
            window_len,
            horizon,
            ..WindowParams::default()
        }
    }

    /// Shifts every value by a fixed offset while noise is enabled, which
    /// makes perturbation visible without randomness.
    struct ConstantNoise {
        offset: f64,
    }

    impl NoiseSource for ConstantNoise {
        fn sample(&mut self, mean: f64, stddev: f64) -> f64 {
            if stddev > 0.0 {
                mean + self.offset
            } else {
                mean
            }
        }
    }

    #[test]
    fn window_and_label_alignment() {
        let builder = WindowDatasetBuilder::new(params(3, 1)).unwrap();
        let mut noise = GaussianNoise::seeded(0);
        let records = builder.build(&ramp_series(10), &mut noise);

        // 10 samples, A=3, B=1 -> 6 windows at stride 1.
        assert_eq!(records.len(), 6);
        assert_eq!(records.inputs.ncols(), 6);
        assert_eq!(records.outputs.ncols(), 2);

        // Window 0 covers samples 0..3 and pairs with clean sample 4.
        let first_input: Vec<f64> = records.inputs.row(0).to_vec();
        assert_eq!(first_input, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(records.outputs[[0, 0]], 4.0);
        assert_eq!(records.outputs[[0, 1]], 14.0);

        // Last window pairs with the final clean sample.
        assert_eq!(records.outputs[[5, 0]], 9.0);
        assert_eq!(records.outputs[[5, 1]], 19.0);
    }

    #[test]
    fn noise_perturbs_inputs_but_never_labels() {
        let mut config = params(3, 1);
        config.azimuth_noise_stddev = 1.0;
        config.elevation_noise_stddev = 1.0;
        let builder = WindowDatasetBuilder::new(config).unwrap();

        let mut noise = ConstantNoise { offset: 0.5 };
        let records = builder.build(&ramp_series(10), &mut noise);

        let first_input: Vec<f64> = records.inputs.row(0).to_vec();
        assert_eq!(first_input, vec![0.5, 1.5, 2.5, 10.5, 11.5, 12.5]);
        assert_eq!(records.outputs[[0, 0]], 4.0);
        assert_eq!(records.outputs[[0, 1]], 14.0);
    }

    #[test]
    fn stride_of_window_len_emits_disjoint_blocks() {
        let mut config = params(3, 1);
        config.stride = 3;
        let builder = WindowDatasetBuilder::new(config).unwrap();
        let mut noise = GaussianNoise::seeded(0);
        let records = builder.build(&ramp_series(10), &mut noise);

        // Valid starts are 0 and 3; start 6 would need sample index 10.
        assert_eq!(records.len(), 2);
        assert_eq!(records.outputs[[0, 0]], 4.0);
        assert_eq!(records.outputs[[1, 0]], 7.0);
    }

    #[test]
    fn compression_collapses_adjacent_duplicates_only() {
        let samples = vec![
            AngularSample::new(timestamp(0), 1.0, 1.0),
            AngularSample::new(timestamp(1), 1.0, 1.0),
            AngularSample::new(timestamp(2), 2.0, 2.0),
            AngularSample::new(timestamp(3), 1.0, 1.0),
        ];
        let retained = compress_duplicates(&samples);
        assert_eq!(retained, vec![(1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]);
    }

    #[test]
    fn compression_is_idempotent() {
        let samples = vec![
            AngularSample::new(timestamp(0), 1.0, 5.0),
            AngularSample::new(timestamp(1), 1.0, 5.0),
            AngularSample::new(timestamp(2), 1.0, 6.0),
            AngularSample::new(timestamp(3), 2.0, 6.0),
            AngularSample::new(timestamp(4), 2.0, 6.0),
        ];
        let once = compress_duplicates(&samples);
        let rebuilt: Vec<AngularSample> = once
            .iter()
            .enumerate()
            .map(|(index, &(azimuth, elevation))| {
                AngularSample::new(timestamp(index as u32), azimuth, elevation)
            })
            .collect();
        let twice = compress_duplicates(&rebuilt);
        assert_eq!(once, twice);
    }

    #[test]
    fn compression_shrinks_the_dataset() {
        let mut config = params(2, 0);
        config.compress_duplicates = true;
        let builder = WindowDatasetBuilder::new(config).unwrap();
        let mut noise = GaussianNoise::seeded(0);

        let samples = vec![
            AngularSample::new(timestamp(0), 1.0, 1.0),
            AngularSample::new(timestamp(1), 1.0, 1.0),
            AngularSample::new(timestamp(2), 2.0, 2.0),
            AngularSample::new(timestamp(3), 3.0, 3.0),
            AngularSample::new(timestamp(4), 4.0, 4.0),
        ];
        let records = builder.build(&samples, &mut noise);
        // 4 retained samples, A=2, B=0 -> 2 windows.
        assert_eq!(records.len(), 2);
        assert_eq!(records.outputs[[0, 0]], 3.0);
    }

    #[test]
    fn zero_noise_output_is_deterministic() {
        let builder = WindowDatasetBuilder::new(params(4, 2)).unwrap();
        let samples = ramp_series(12);

        let first = builder.build(&samples, &mut GaussianNoise::new());
        let second = builder.build(&samples, &mut GaussianNoise::new());
        assert_eq!(first.inputs, second.inputs);
        assert_eq!(first.outputs, second.outputs);
    }

    #[test]
    fn seeded_noise_output_is_reproducible() {
        let mut config = params(4, 2);
        config.azimuth_noise_stddev = 0.3;
        config.elevation_noise_stddev = 0.1;
        let builder = WindowDatasetBuilder::new(config).unwrap();
        let samples = ramp_series(12);

        let first = builder.build(&samples, &mut GaussianNoise::seeded(17));
        let second = builder.build(&samples, &mut GaussianNoise::seeded(17));
        assert_eq!(first.inputs, second.inputs);

        let third = builder.build(&samples, &mut GaussianNoise::seeded(18));
        assert_ne!(first.inputs, third.inputs);
    }

    #[test]
    fn short_trajectory_yields_empty_result() {
        let builder = WindowDatasetBuilder::new(params(3, 1)).unwrap();
        let mut noise = GaussianNoise::seeded(0);

        let records = builder.build(&ramp_series(4), &mut noise);
        assert!(records.is_empty());
        assert_eq!(records.inputs.ncols(), 6);

        // One sample past the minimum produces exactly one window.
        let records = builder.build(&ramp_series(5), &mut noise);
        assert_eq!(records.len(), 1);
        assert_eq!(records.outputs[[0, 0]], 4.0);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(WindowDatasetBuilder::new(params(0, 1)).is_err());

        let mut config = params(3, 1);
        config.stride = 0;
        assert!(WindowDatasetBuilder::new(config).is_err());

        let mut config = params(3, 1);
        config.azimuth_noise_stddev = -0.5;
        assert!(WindowDatasetBuilder::new(config).is_err());

        let mut config = params(3, 1);
        config.elevation_noise_stddev = f64::NAN;
        assert!(WindowDatasetBuilder::new(config).is_err());
    }
}

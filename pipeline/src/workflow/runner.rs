use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use trackcore::angles::TrajectoryAngularizer;
use trackcore::dataset::{GaussianNoise, WindowDatasetBuilder, WindowRecords};
use trackcore::math::StatsHelper;
use trackcore::prelude::PipelineError;
use trackcore::telemetry::MetricsRecorder;
use trackcore::track::{AngleSeries, TrackPoint};

use crate::ingest::{parse_srt, project_to_local};
use crate::workflow::config::PipelineConfig;
use crate::workflow::io;
use crate::workflow::store::{FsStore, OutputStore};

/// Outcome of one in-memory pipeline pass, also published to the preview
/// bridge.
pub struct WorkflowResult {
    pub series: AngleSeries,
    pub records: WindowRecords,
    pub notes: Vec<String>,
}

/// End-of-run counters for a batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: PipelineConfig,
}

impl Runner {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Angularizes and windows one trajectory entirely in memory.
    pub fn process_track(&self, points: &[TrackPoint]) -> anyhow::Result<WorkflowResult> {
        let angularizer = TrajectoryAngularizer::new(self.config.observer);
        let series = angularizer.angularize(points);

        let builder = WindowDatasetBuilder::new(self.config.to_window_params())
            .context("configuring window builder")?;
        let mut noise = GaussianNoise::new();
        let records = builder.build(&series.samples, &mut noise);

        let azimuths: Vec<f64> = series.samples.iter().map(|s| s.azimuth_deg).collect();
        let notes = vec![
            format!("azimuth span {:.1} deg", StatsHelper::span(&azimuths)),
            format!(
                "{} samples -> {} windows",
                series.samples.len(),
                records.len()
            ),
        ];

        Ok(WorkflowResult {
            series,
            records,
            notes,
        })
    }

    /// Processes every flight log under the raw directory. One log's failure
    /// is counted and logged, never fatal for the batch; a missing raw
    /// directory is.
    pub fn run_batch(&self) -> anyhow::Result<BatchSummary> {
        let raw_dir = &self.config.raw_dir;
        if !raw_dir.is_dir() {
            return Err(
                PipelineError::MissingInput(format!("raw directory {}", raw_dir.display())).into(),
            );
        }
        io::prepare_data_dir(&self.config.data_dir)?;

        let store = FsStore::new(self.config.overwrite);
        let metrics = MetricsRecorder::new();

        let mut logs: Vec<PathBuf> = fs::read_dir(raw_dir)
            .with_context(|| format!("listing {}", raw_dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|extension| extension.eq_ignore_ascii_case("srt"))
                    .unwrap_or(false)
            })
            .collect();
        logs.sort();

        for log_path in &logs {
            match self.process_log(log_path, &store) {
                Ok(true) => metrics.record_processed(),
                Ok(false) => metrics.record_skipped(),
                Err(error) => {
                    warn!("{} failed: {:#}", log_path.display(), error);
                    metrics.record_failed();
                }
            }
        }

        let (processed, skipped, failed) = metrics.snapshot();
        info!(
            "batch complete: {} processed, {} skipped, {} failed",
            processed, skipped, failed
        );
        Ok(BatchSummary {
            processed,
            skipped,
            failed,
        })
    }

    /// Runs the convert/angularize/window stages for one log, consulting the
    /// store so unchanged artifacts are not regenerated. Returns whether any
    /// stage did work.
    fn process_log(&self, log_path: &Path, store: &dyn OutputStore) -> anyhow::Result<bool> {
        let stem = log_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                PipelineError::MissingInput(format!("unusable file name {}", log_path.display()))
            })?;

        let xyz_path = self.config.data_dir.join(format!("{}_xyz.txt", stem));
        let ang_path = self.config.data_dir.join(format!("{}_ang.txt", stem));
        let input_path = self.config.data_dir.join(format!("{}_input.txt", stem));
        let output_path = self.config.data_dir.join(format!("{}_output.txt", stem));

        let mut did_work = false;

        if !store.up_to_date(log_path, &xyz_path) {
            let contents = fs::read_to_string(log_path)
                .with_context(|| format!("reading {}", log_path.display()))?;
            let samples = parse_srt(&contents);
            if samples.is_empty() {
                warn!("{} has no usable records, skipping", log_path.display());
                return Ok(false);
            }
            let points = project_to_local(&samples);
            io::write_xyz(&xyz_path, &points)?;
            info!(
                "{} -> {} ({} points)",
                log_path.display(),
                xyz_path.display(),
                points.len()
            );
            did_work = true;
        }

        if !store.up_to_date(&xyz_path, &ang_path) {
            let points = io::read_xyz(&xyz_path)?;
            let angularizer = TrajectoryAngularizer::new(self.config.observer);
            let series = angularizer.angularize(&points);
            if series.stats.out_of_order > 0 {
                warn!(
                    "{}: {} out-of-order timestamps",
                    xyz_path.display(),
                    series.stats.out_of_order
                );
            }
            if series.stats.degenerate > 0 {
                warn!(
                    "{}: {} degenerate geometry samples",
                    xyz_path.display(),
                    series.stats.degenerate
                );
            }
            io::write_angles(&ang_path, &series.samples)?;
            did_work = true;
        }

        if !store.up_to_date(&ang_path, &input_path) || !store.up_to_date(&ang_path, &output_path) {
            let samples = io::read_angles(&ang_path)?;
            let builder = WindowDatasetBuilder::new(self.config.to_window_params())
                .context("configuring window builder")?;
            let mut noise = GaussianNoise::new();
            let records = builder.build(&samples, &mut noise);
            if records.is_empty() {
                warn!(
                    "{}: trajectory too short for window {} + horizon {}",
                    ang_path.display(),
                    self.config.window_len,
                    self.config.horizon
                );
            }
            io::write_dataset(&input_path, &output_path, &records)?;
            did_work = true;
        }

        Ok(did_work)
    }
}

use serde::{Deserialize, Serialize};

use crate::workflow::runner::WorkflowResult;

/// Snapshot of the most recently processed trajectory, served to the
/// visualizer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub azimuth_deg: Vec<f64>,
    pub elevation_deg: Vec<f64>,
    pub window_count: usize,
    pub out_of_order: usize,
    pub degenerate: usize,
    pub notes: Vec<String>,
}

impl VisualizationModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        Self {
            azimuth_deg: result
                .series
                .samples
                .iter()
                .map(|sample| sample.azimuth_deg)
                .collect(),
            elevation_deg: result
                .series
                .samples
                .iter()
                .map(|sample| sample.elevation_deg)
                .collect(),
            window_count: result.records.len(),
            out_of_order: result.series.stats.out_of_order,
            degenerate: result.series.stats.degenerate,
            notes: result.notes.clone(),
        }
    }
}

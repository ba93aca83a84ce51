use anyhow::Context;
use clap::Parser;
use generator::orbit::build_demo_track;
use gui_bridge::bridge::PreviewBridge;
use gui_bridge::model::VisualizationModel;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::PipelineConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod ingest;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Flight-track pointing dataset driver")]
struct Args {
    /// Process every flight log under the raw directory
    #[arg(long, default_value_t = false)]
    batch: bool,
    /// Run a synthetic orbit through the in-memory pipeline
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Load a pipeline config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the raw flight-log directory
    #[arg(long)]
    raw_dir: Option<PathBuf>,
    /// Override the derived-data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the input window length (A)
    #[arg(long)]
    window_len: Option<usize>,
    /// Override the prediction horizon (B)
    #[arg(long)]
    horizon: Option<usize>,
    /// Keep the preview bridge alive for the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.config {
        PipelineConfig::load(path)?
    } else {
        PipelineConfig::default()
    };
    if let Some(raw_dir) = args.raw_dir {
        config.raw_dir = raw_dir;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(window_len) = args.window_len {
        config.window_len = window_len;
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }

    let runner = Runner::new(config);
    let bridge = PreviewBridge::new(Arc::new(runner.clone()));

    if args.batch {
        let summary = runner.run_batch()?;
        println!(
            "Batch run -> processed {}, skipped {}, failed {}",
            summary.processed, summary.skipped, summary.failed
        );
    }

    if args.demo {
        let points = build_demo_track(240, 7, runner.config().observer);
        let result = runner
            .process_track(&points)
            .context("running demo orbit")?;
        println!(
            "Demo orbit -> {} angle samples, {} windows",
            result.series.samples.len(),
            result.records.len()
        );
        bridge.publish(&VisualizationModel::from_result(&result))?;
        bridge.publish_status("Demo trajectory ready.");
    }

    if args.serve {
        bridge.publish_status("Preview bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

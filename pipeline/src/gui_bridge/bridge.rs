use crate::generator::orbit::{build_orbit_track, OrbitConfig};
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use trackcore::track::TrackPoint;
use warp::{http::StatusCode, Filter};

fn preview_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9100))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Bridge that hosts the trajectory preview endpoint and processes incoming
/// tracks.
pub struct PreviewBridge {
    state: Arc<RwLock<VisualizationModel>>,
}

impl PreviewBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state = Arc::new(RwLock::new(VisualizationModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("trajectory")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<VisualizationModel>>| {
                warp::reply::json(&*state.read().unwrap())
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |points: Vec<TrackPoint>,
                 state: Arc<RwLock<VisualizationModel>>,
                 runner: Arc<Runner>| async move {
                    match runner.process_track(&points) {
                        Ok(result) => {
                            let mut guard = state.write().unwrap();
                            *guard = VisualizationModel::from_result(&result);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok"})),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let orbit_route = warp::path("ingest-orbit")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: OrbitConfig,
                 state: Arc<RwLock<VisualizationModel>>,
                 runner: Arc<Runner>| async move {
                    let points = build_orbit_track(&config, runner.config().observer);
                    match runner.process_track(&points) {
                        Ok(result) => {
                            let mut guard = state.write().unwrap();
                            *guard = VisualizationModel::from_result(&result);
                            if let Some(name) = config.description.as_ref() {
                                println!(
                                    "[preview] orbit '{}' -> {} windows",
                                    name,
                                    result.records.len()
                                );
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "windows": result.records.len(),
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-orbit error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(ingest_route).or(orbit_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(preview_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[preview] {} angle samples, {} windows",
            guard.azimuth_deg.len(),
            guard.window_count
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[preview] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::orbit::build_demo_track;
    use crate::workflow::config::PipelineConfig;
    use crate::workflow::runner::Runner;
    use std::sync::Arc;

    #[test]
    fn preview_bridge_updates_state() {
        let mut config = PipelineConfig::default();
        config.window_len = 3;
        config.horizon = 1;
        let runner = Arc::new(Runner::new(config.clone()));
        let bridge = PreviewBridge::new(runner.clone());

        let points = build_demo_track(20, 3, config.observer);
        let result = runner.process_track(&points).unwrap();
        bridge
            .publish(&VisualizationModel::from_result(&result))
            .unwrap();

        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.azimuth_deg.len(), 20);
        assert_eq!(snapshot.window_count, result.records.len());
    }
}

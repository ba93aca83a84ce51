use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Flight-Track Pointing Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    config: ConfigForm,
    payload: Option<TrajectoryPayload>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<TrajectoryPayload, String>),
    ConfigFieldChanged(ConfigField, String),
    SubmitConfig,
    ConfigSubmitted(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum ConfigField {
    Samples,
    Radius,
    Revolutions,
    Climb,
    Jitter,
    Seed,
    Description,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                config: ConfigForm::default(),
                payload: None,
                status: "Waiting for trajectory...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.status = format!(
                    "Trajectory received: {} samples / {} windows",
                    payload.azimuth_deg.len(),
                    payload.window_count
                );
                state.push_history(format!(
                    "Trajectory: {} samples / {} windows",
                    payload.azimuth_deg.len(),
                    payload.window_count
                ));
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Trajectory error: {err}");
                Task::none()
            }
            Message::ConfigFieldChanged(field, value) => {
                state.config.update_field(field, value);
                Task::none()
            }
            Message::SubmitConfig => {
                let payload = state.config.to_payload();
                Task::perform(post_config(payload), Message::ConfigSubmitted)
            }
            Message::ConfigSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Orbit scenario submitted".into());
                Task::none()
            }
            Message::ConfigSubmitted(Err(err)) => {
                state.status = format!("Config error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let notes = state
            .payload
            .as_ref()
            .map(|payload| payload.notes.clone())
            .unwrap_or_default();

        let config_column = column![
            text("Orbit Scenario").size(26),
            text_input("Samples", &state.config.samples)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Samples, value))
                .padding(6),
            text_input("Radius (m)", &state.config.radius)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Radius, value))
                .padding(6),
            text_input("Revolutions", &state.config.revolutions)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Revolutions, value))
                .padding(6),
            text_input("Climb (m)", &state.config.climb)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Climb, value))
                .padding(6),
            text_input("Jitter (m)", &state.config.jitter)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Jitter, value))
                .padding(6),
            text_input("Seed", &state.config.seed)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Seed, value))
                .padding(6),
            text_input("Description", &state.config.description)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Description, value))
                .padding(6),
            button("POST scenario")
                .on_press(Message::SubmitConfig)
                .padding(10),
            text(&state.status).size(14),
            column![
                text("Parameter definitions").size(16),
                text("Samples: trajectory length; more samples smooth the angle traces.")
                    .size(12),
                text("Radius: orbit radius around the observer, meters.").size(12),
                text("Revolutions: full turns flown; beyond 1.0 exercises azimuth unwrapping.")
                    .size(12),
                text("Climb: altitude gained across the orbit, driving the elevation trace.")
                    .size(12),
                text("Jitter: per-axis position noise amplitude, meters.").size(12),
                text("Seed: deterministic PRNG seeding so scenarios replay consistently.")
                    .size(12),
                text("Description: free-text note included in the ingest log.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let trajectory_info = if let Some(payload) = &state.payload {
            text(format!(
                "Windows: {} / {} samples",
                payload.window_count,
                payload.azimuth_deg.len()
            ))
            .size(18)
        } else {
            text("Windows: n/a").size(18)
        };

        let (azimuth, elevation) = state
            .payload
            .as_ref()
            .map(|payload| (payload.azimuth_deg.clone(), payload.elevation_deg.clone()))
            .unwrap_or_default();

        let angle_trace = Canvas::new(AngleTrace {
            azimuth: azimuth.clone(),
            elevation: elevation.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(260.0));

        let path_canvas = Canvas::new(PointingPath { azimuth, elevation })
            .width(Length::Fill)
            .height(Length::Fixed(220.0));

        let diagnostics = if let Some(payload) = &state.payload {
            Column::new().spacing(4).push(
                text(format!(
                    "out-of-order {} | degenerate {}",
                    payload.out_of_order, payload.degenerate
                ))
                .size(12),
            )
        } else {
            Column::new().push(text("No diagnostics yet").size(12))
        };

        let notes_list = if notes.is_empty() {
            Column::new().push(text("No notes yet").size(14))
        } else {
            notes
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, note| {
                    col.push(text(note.clone()).size(14))
                })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let telemetry_column = column![
            text("Trajectory").size(26),
            trajectory_info,
            text("Azimuth (cyan) and elevation (amber) traces").size(18),
            angle_trace,
            text("Pointing path (azimuth vs elevation)").size(16),
            path_canvas,
            text("Diagnostics").size(16),
            Container::new(diagnostics).padding(6),
            text("Processing notes").size(16),
            Container::new(scrollable(notes_list).height(Length::Fixed(120.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![config_column, telemetry_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_payload() -> Result<TrajectoryPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9100/trajectory")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<TrajectoryPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_config(config: OrbitScenario) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9100/ingest-orbit")
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Orbit scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct ConfigForm {
    samples: String,
    radius: String,
    revolutions: String,
    climb: String,
    jitter: String,
    seed: String,
    description: String,
}

impl ConfigForm {
    fn default() -> Self {
        Self {
            samples: "240".into(),
            radius: "50".into(),
            revolutions: "1.5".into(),
            climb: "20".into(),
            jitter: "0.05".into(),
            seed: "7".into(),
            description: "Visualizer orbit scenario".into(),
        }
    }

    fn update_field(&mut self, field: ConfigField, value: String) {
        match field {
            ConfigField::Samples => self.samples = value,
            ConfigField::Radius => self.radius = value,
            ConfigField::Revolutions => self.revolutions = value,
            ConfigField::Climb => self.climb = value,
            ConfigField::Jitter => self.jitter = value,
            ConfigField::Seed => self.seed = value,
            ConfigField::Description => self.description = value,
        }
    }

    fn to_payload(&self) -> OrbitScenario {
        OrbitScenario {
            samples: self.samples.parse().ok(),
            radius_m: self.radius.parse().ok(),
            revolutions: self.revolutions.parse().ok(),
            climb_m: self.climb.parse().ok(),
            jitter_m: self.jitter.parse().ok(),
            seed: self.seed.parse().ok(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct OrbitScenario {
    #[serde(skip_serializing_if = "Option::is_none")]
    samples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    revolutions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    climb_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jitter_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TrajectoryPayload {
    #[serde(default)]
    azimuth_deg: Vec<f64>,
    #[serde(default)]
    elevation_deg: Vec<f64>,
    #[serde(default)]
    window_count: usize,
    #[serde(default)]
    out_of_order: usize,
    #[serde(default)]
    degenerate: usize,
    #[serde(default)]
    notes: Vec<String>,
}

fn normalized_polyline(bounds: &Rectangle, data: &[f64]) -> Option<Path> {
    if data.len() < 2 {
        return None;
    }
    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(1e-9);
    let step = bounds.width / (data.len() as f32 - 1.0);
    Some(Path::new(|builder| {
        for (i, value) in data.iter().enumerate() {
            let x = i as f32 * step;
            let normalized = ((value - min) / range) as f32;
            let y = bounds.height - normalized * bounds.height;
            if i == 0 {
                builder.move_to(Point::new(x, y));
            } else {
                builder.line_to(Point::new(x, y));
            }
        }
    }))
}

#[derive(Clone)]
struct AngleTrace {
    azimuth: Vec<f64>,
    elevation: Vec<f64>,
}

impl canvas::Program<Message> for AngleTrace {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        if let Some(path) = normalized_polyline(&bounds, &self.azimuth) {
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.5)
                    .with_color(Color::from_rgb(0.18, 0.72, 0.89)),
            );
        }
        if let Some(path) = normalized_polyline(&bounds, &self.elevation) {
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb(0.95, 0.65, 0.2)),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct PointingPath {
    azimuth: Vec<f64>,
    elevation: Vec<f64>,
}

impl canvas::Program<Message> for PointingPath {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        let margin = 12.0_f32;
        let plot_width = (bounds.width - 2.0 * margin).max(1.0);
        let plot_height = (bounds.height - 2.0 * margin).max(1.0);

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(margin, margin));
            builder.line_to(Point::new(margin, margin + plot_height));
            builder.line_to(Point::new(margin + plot_width, margin + plot_height));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.35, 0.35, 0.45))
                .with_width(1.0),
        );

        let count = self.azimuth.len().min(self.elevation.len());
        if count >= 2 {
            let azimuth = &self.azimuth[..count];
            let elevation = &self.elevation[..count];
            let az_min = azimuth.iter().cloned().fold(f64::INFINITY, f64::min);
            let az_max = azimuth.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let az_range = (az_max - az_min).max(1e-9);
            let el_min = elevation.iter().cloned().fold(f64::INFINITY, f64::min);
            let el_max = elevation.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let el_range = (el_max - el_min).max(1e-9);

            let project = |az: f64, el: f64| {
                let x = margin + (((az - az_min) / az_range) as f32) * plot_width;
                let y = margin + plot_height - (((el - el_min) / el_range) as f32) * plot_height;
                Point::new(x, y)
            };

            let path = Path::new(|builder| {
                for (i, (&az, &el)) in azimuth.iter().zip(elevation.iter()).enumerate() {
                    let point = project(az, el);
                    if i == 0 {
                        builder.move_to(point);
                    } else {
                        builder.line_to(point);
                    }
                }
            });
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb(0.55, 0.85, 0.45)),
            );

            let start = Path::new(|builder| builder.circle(project(azimuth[0], elevation[0]), 4.0));
            frame.fill(&start, Color::from_rgb(0.18, 0.72, 0.89));
            let end = Path::new(|builder| {
                builder.circle(project(azimuth[count - 1], elevation[count - 1]), 4.0)
            });
            frame.fill(&end, Color::from_rgb(0.95, 0.55, 0.2));
        }

        vec![frame.into_geometry()]
    }
}

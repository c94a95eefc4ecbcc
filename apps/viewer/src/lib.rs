use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rtls_core::{DeviceStore, PixelVec};
use rtls_feed::{split_message, FeedEvent, FeedOutcome, FeedParseError, FeedSession};
use rtls_renderer::{
    GridPlanner, IconRegistry, InputController, InputEvent, MarkerProjector, RenderError,
    RenderFrame, RenderLoop, Surface, Viewport,
};

pub mod config;

use config::ViewerConfig;

/// Session state owned by the host: the single viewport and device store,
/// plus the components that read and mutate them.
pub struct AppState {
    pub viewport: Viewport,
    pub store: DeviceStore,
    input: InputController,
    feed: FeedSession,
    renderer: RenderLoop,
}

impl AppState {
    pub fn from_config(config: &ViewerConfig) -> Result<Self, RenderError> {
        let surface = Surface::new(config.surface.width, config.surface.height)?;
        let icons = IconRegistry::new(config.markers.icons.clone())?;
        let offset = match config.viewport.offset {
            Some([x, y]) => PixelVec::new(x, y),
            None => Viewport::for_surface(&surface).offset,
        };
        let viewport = Viewport::new(config.viewport.zoom, offset);
        let grid = GridPlanner::new(config.grid.target_pixel_spacing)?;
        let markers = MarkerProjector::new(config.markers.icon_size, config.markers.border)?;
        Ok(Self {
            viewport,
            store: DeviceStore::new(),
            input: InputController::new(),
            feed: FeedSession::new(config.feed.clone()),
            renderer: RenderLoop::new(surface, grid, markers, icons),
        })
    }

    /// Apply one host event, returning whatever must be written out.
    pub fn handle(&mut self, event: HostEvent) -> Option<HostOutput> {
        match event {
            HostEvent::Tick => Some(HostOutput::Frame {
                frame: self.renderer.tick(&self.viewport, &self.store),
            }),
            HostEvent::PointerDown => self.on_input(InputEvent::PointerDown),
            HostEvent::PointerUp => self.on_input(InputEvent::PointerUp),
            HostEvent::PointerMove { dx, dy } => self.on_input(InputEvent::PointerMove {
                delta: PixelVec::new(dx, dy),
            }),
            HostEvent::Wheel { x, y, delta } => self.on_input(InputEvent::Wheel {
                cursor: PixelVec::new(x, y),
                delta,
            }),
            HostEvent::Open => self.on_feed(FeedEvent::Open),
            HostEvent::Message { data } => match message_records(data) {
                Ok(records) => self.on_feed(FeedEvent::Batch { records }),
                Err(e) => {
                    warn!("dropping feed message: {}", e);
                    None
                }
            },
            HostEvent::Closed {
                code,
                reason,
                clean,
            } => self.on_feed(FeedEvent::Closed {
                code,
                reason,
                clean,
            }),
            HostEvent::Error { message } => self.on_feed(FeedEvent::Failed { message }),
        }
    }

    fn on_input(&mut self, event: InputEvent) -> Option<HostOutput> {
        self.input.handle(&mut self.viewport, event);
        None
    }

    fn on_feed(&mut self, event: FeedEvent) -> Option<HostOutput> {
        match self.feed.dispatch(event, &mut self.store) {
            FeedOutcome::Send(text) => Some(HostOutput::Send { text }),
            FeedOutcome::Applied(_) | FeedOutcome::Disconnected => None,
        }
    }
}

/// A text payload is the raw websocket message; anything else is taken as the
/// already decoded batch.
fn message_records(data: Value) -> Result<Vec<Value>, FeedParseError> {
    match data {
        Value::String(text) => split_message(&text),
        other => rtls_feed::protocol::split_value(other),
    }
}

/// One line of the event script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Render a frame.
    Tick,
    PointerDown,
    PointerUp,
    PointerMove { dx: f64, dy: f64 },
    Wheel { x: f64, y: f64, delta: f64 },
    /// Feed connection opened.
    Open,
    /// Feed message received.
    Message { data: Value },
    Closed {
        code: u16,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        clean: bool,
    },
    Error { message: String },
}

/// One line written back by the host.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostOutput {
    /// Text to send over the feed connection.
    Send { text: String },
    Frame { frame: RenderFrame },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub events: usize,
    pub skipped: usize,
    pub frames: usize,
}

/// Drive a session from a JSON-lines event script until end of input.
///
/// Blank lines and lines starting with `#` are ignored; unparsable lines are
/// logged and skipped.
pub fn run_session<R: BufRead, W: Write>(
    state: &mut AppState,
    reader: R,
    mut writer: W,
) -> Result<SessionStats> {
    let mut stats = SessionStats::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event script")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: HostEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("skipping script line {}: {}", number + 1, e);
                stats.skipped += 1;
                continue;
            }
        };
        debug!("line {}: {:?}", number + 1, event);
        stats.events += 1;

        if let Some(output) = state.handle(event) {
            if matches!(output, HostOutput::Frame { .. }) {
                stats.frames += 1;
            }
            serde_json::to_writer(&mut writer, &output).context("Failed to encode output")?;
            writeln!(writer).context("Failed to write output")?;
        }
    }
    writer.flush().context("Failed to flush output")?;
    info!(
        "session finished: {} events, {} frames, {} skipped lines, {} devices",
        stats.events,
        stats.frames,
        stats.skipped,
        state.store.len()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn state() -> AppState {
        AppState::from_config(&ViewerConfig::default()).unwrap()
    }

    fn run(script: &str) -> (AppState, SessionStats, Vec<Value>) {
        let mut state = state();
        let mut out = Vec::new();
        let stats = run_session(&mut state, Cursor::new(script), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (state, stats, lines)
    }

    #[test]
    fn test_default_state() {
        let state = state();
        assert_eq!(state.viewport.zoom, 0.5);
        assert!((state.viewport.offset.x - 640.0 / 3.0).abs() < 1e-9);
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ViewerConfig::default();
        config.markers.icons.clear();
        assert!(matches!(
            AppState::from_config(&config),
            Err(RenderError::EmptyIconRegistry)
        ));

        let mut config = ViewerConfig::default();
        config.surface.width = 0.0;
        assert!(AppState::from_config(&config).is_err());

        let mut config = ViewerConfig::default();
        config.grid.target_pixel_spacing = 0.0;
        assert!(matches!(
            AppState::from_config(&config),
            Err(RenderError::InvalidGridSpacing { .. })
        ));

        let mut config = ViewerConfig::default();
        config.markers.icon_size = -1.0;
        assert!(matches!(
            AppState::from_config(&config),
            Err(RenderError::InvalidIconSize { .. })
        ));
    }

    #[test]
    fn test_configured_zoom_is_clamped() {
        let mut config = ViewerConfig::default();
        config.viewport.zoom = 100.0;
        assert_eq!(AppState::from_config(&config).unwrap().viewport.zoom, 10.0);
    }

    #[test]
    fn test_session_script() {
        let script = r#"
# feed comes up and reports two devices
{"type": "open"}
{"type": "message", "data": [{"id": 1, "pos": {"coords": [0, 0, 0]}}, {"id": 2, "pos": {"coords": [2000, 2000]}}]}
{"type": "message", "data": "[{\"id\": 3, \"pos\": {\"coords\": [5, 5]}}, {\"bad\": true}]"}
{"type": "message", "data": {"not": "a batch"}}
this line is garbage
{"type": "tick"}
{"type": "closed", "code": 1000, "reason": "done", "clean": true}
"#;
        let (state, stats, lines) = run(script);
        assert_eq!(stats.events, 6);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.frames, 1);
        assert_eq!(state.store.len(), 3);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "send");
        assert_eq!(lines[0]["text"], "rtls-viewer");
        assert_eq!(lines[1]["type"], "frame");
        assert_eq!(lines[1]["frame"]["device_count"], 3);
    }

    #[test]
    fn test_pan_and_zoom_script() {
        let script = r#"
{"type": "pointer_move", "dx": 100, "dy": 100}
{"type": "pointer_down"}
{"type": "pointer_move", "dx": 10, "dy": -5}
{"type": "pointer_up"}
{"type": "pointer_move", "dx": 10, "dy": -5}
"#;
        let (state, _, lines) = run(script);
        assert!(lines.is_empty());
        assert!((state.viewport.offset.x - (640.0 / 3.0 + 10.0)).abs() < 1e-9);
        assert!((state.viewport.offset.y - (1280.0 / 3.0 - 5.0)).abs() < 1e-9);
        assert!(!state.viewport.panning);

        let (state, _, _) = run(r#"{"type": "wheel", "x": 320, "y": 320, "delta": -100}"#);
        assert!(state.viewport.zoom > 0.5);
    }
}

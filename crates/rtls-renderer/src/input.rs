use log::debug;
use serde::{Deserialize, Serialize};

use rtls_core::PixelVec;

use crate::viewport::Viewport;

/// Normalized pointer and wheel events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer pressed over the surface.
    PointerDown,
    /// Pointer released anywhere, not only over the surface.
    PointerUp,
    /// Pointer moved by `delta` pixels since the previous move.
    PointerMove { delta: PixelVec },
    /// Wheel turned by `delta` with the cursor at `cursor`.
    Wheel { cursor: PixelVec, delta: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanState {
    Idle,
    Panning,
}

/// Turns input events into viewport mutations.
///
/// The pan state lives in [`Viewport::panning`] so a frame always sees a
/// single source of truth; the controller only interprets events.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputController;

impl InputController {
    pub fn new() -> Self {
        Self
    }

    pub fn state(&self, viewport: &Viewport) -> PanState {
        if viewport.panning {
            PanState::Panning
        } else {
            PanState::Idle
        }
    }

    pub fn handle(&self, viewport: &mut Viewport, event: InputEvent) {
        match event {
            InputEvent::PointerDown => viewport.panning = true,
            InputEvent::PointerUp => viewport.panning = false,
            InputEvent::PointerMove { delta } => {
                viewport.pan(delta);
            }
            InputEvent::Wheel { cursor, delta } => {
                if let Err(e) = viewport.zoom_at(cursor, delta) {
                    debug!("ignoring wheel event: {}", e);
                }
            }
        }
    }
}

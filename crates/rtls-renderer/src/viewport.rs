use serde::{Deserialize, Serialize};

use rtls_core::{PixelVec, RealVec};

use crate::error::RenderError;

/// Smallest allowed zoom (pixels per real-world unit).
pub const MIN_ZOOM: f64 = 0.05;
/// Largest allowed zoom (pixels per real-world unit).
pub const MAX_ZOOM: f64 = 10.0;
/// Zoom used when a session starts.
pub const DEFAULT_ZOOM: f64 = 0.5;

/// The fixed-size bitmap surface the map is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Result<Self, RenderError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(RenderError::InvalidSurface { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Pan/zoom state of the map and the real-world <-> pixel transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pixels per real-world unit, always within [`MIN_ZOOM`, `MAX_ZOOM`].
    pub zoom: f64,
    /// Pixel position of the real-world origin.
    pub offset: PixelVec,
    /// Whether pointer movement currently drags the map.
    pub panning: bool,
}

impl Viewport {
    pub fn new(zoom: f64, offset: PixelVec) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            offset,
            panning: false,
        }
    }

    /// The start-up view: origin a third of the way in from the left and
    /// two thirds of the way down.
    pub fn for_surface(surface: &Surface) -> Self {
        Self::new(
            DEFAULT_ZOOM,
            PixelVec::new(surface.width / 3.0, surface.height * 2.0 / 3.0),
        )
    }

    /// Convert a real-world position to pixel space (Y flipped).
    pub fn to_pixel(&self, pos: RealVec) -> PixelVec {
        PixelVec::new(
            pos.x * self.zoom + self.offset.x,
            -pos.y * self.zoom + self.offset.y,
        )
    }

    /// Convert a pixel position back to real-world space.
    pub fn to_real(&self, px: PixelVec) -> RealVec {
        RealVec::new(
            (px.x - self.offset.x) / self.zoom,
            -(px.y - self.offset.y) / self.zoom,
        )
    }

    /// Zoom keeping the real-world point under `cursor` fixed on screen.
    ///
    /// A delta that cancels the current zoom (or is not finite) skips the zoom
    /// step and reports [`RenderError::DegenerateInput`]; the viewport is still
    /// left clamped and consistent.
    pub fn zoom_at(&mut self, cursor: PixelVec, delta: f64) -> Result<(), RenderError> {
        let anchor = self.to_real(cursor);

        let denominator = delta + self.zoom;
        let degenerate = denominator == 0.0 || !delta.is_finite();
        if !degenerate {
            self.zoom += (-10.0 * self.zoom) / denominator;
        }
        self.zoom = clamp_zoom(self.zoom);

        let moved = self.to_pixel(anchor);
        self.offset += cursor - moved;

        if degenerate {
            Err(RenderError::DegenerateInput {
                delta,
                zoom: self.zoom,
            })
        } else {
            Ok(())
        }
    }

    /// Drag the map by a pixel delta. Only has an effect while panning.
    pub fn pan(&mut self, delta: PixelVec) -> bool {
        if !self.panning {
            return false;
        }
        self.offset += delta;
        true
    }

    /// Real-world rectangle currently visible on `surface`: `(min, max)`.
    pub fn visible_bounds(&self, surface: &Surface) -> (RealVec, RealVec) {
        let top_left = self.to_real(PixelVec::new(0.0, 0.0));
        let bottom_right = self.to_real(PixelVec::new(surface.width, surface.height));
        (
            RealVec::new(top_left.x, bottom_right.y),
            RealVec::new(bottom_right.x, top_left.y),
        )
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

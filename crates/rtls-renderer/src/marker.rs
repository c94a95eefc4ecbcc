//! Device markers: projection to pixel space, edge pinning and dimming.
//!
//! A device outside the visible area is not dropped. Its marker is pinned to
//! the nearest edge of the surface and drawn faded, so the user can still see
//! in which direction it lies.

use serde::{Deserialize, Serialize};

use rtls_core::{Device, DeviceId, PixelVec};

use crate::error::RenderError;
use crate::icons::IconRegistry;
use crate::render_data::{DrawCommand, TextAlign, MARKER_FILL, MARKER_FONT_PX};
use crate::viewport::{Surface, Viewport};

pub const DEFAULT_ICON_SIZE: f64 = 50.0;
pub const ON_SCREEN_OPACITY: f32 = 1.0;
pub const OFF_SCREEN_OPACITY: f32 = 0.2;

/// Vertical distance from the marker anchor to the id label baseline.
const ID_LABEL_OFFSET: f64 = 25.0;
/// Vertical distance from the marker anchor to the coordinate label baseline.
const COORDS_LABEL_OFFSET: f64 = 45.0;

/// A device placed on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: DeviceId,
    /// Anchor point after edge clamping (bottom centre of the icon).
    pub anchor: PixelVec,
    /// Anchor before clamping.
    pub raw: PixelVec,
    pub on_screen: bool,
    pub opacity: f32,
    pub icon_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerProjector {
    /// Width and height of the icon box.
    pub icon_size: f64,
    /// Margin kept between a pinned marker and the surface edge; `<= 0`
    /// disables pinning.
    pub border: f64,
}

impl Default for MarkerProjector {
    fn default() -> Self {
        Self {
            icon_size: DEFAULT_ICON_SIZE,
            border: DEFAULT_ICON_SIZE,
        }
    }
}

impl MarkerProjector {
    /// Fails for a non-positive or non-finite icon size. A border `<= 0` is
    /// valid and disables pinning.
    pub fn new(icon_size: f64, border: f64) -> Result<Self, RenderError> {
        if !(icon_size > 0.0 && icon_size.is_finite()) {
            return Err(RenderError::InvalidIconSize { size: icon_size });
        }
        Ok(Self { icon_size, border })
    }

    pub fn project(
        &self,
        device: &Device,
        viewport: &Viewport,
        surface: &Surface,
        icons: &IconRegistry,
    ) -> Marker {
        let raw = viewport.to_pixel(device.position);
        let (anchor, on_screen) = clamp_to_surface(raw, self.border, surface);
        Marker {
            id: device.id,
            anchor,
            raw,
            on_screen,
            opacity: if on_screen {
                ON_SCREEN_OPACITY
            } else {
                OFF_SCREEN_OPACITY
            },
            icon_index: icons.index_for(device.id),
        }
    }

    /// Icon plus id and coordinate labels beneath it.
    pub fn draw(
        &self,
        device: &Device,
        viewport: &Viewport,
        surface: &Surface,
        icons: &IconRegistry,
    ) -> Vec<DrawCommand> {
        let marker = self.project(device, viewport, surface, icons);
        let PixelVec { x, y } = marker.anchor;
        vec![
            DrawCommand::Image {
                icon: marker.icon_index,
                source: icons.icon_for(device.id).to_string(),
                origin: PixelVec::new(x - self.icon_size / 2.0, y - self.icon_size),
                width: self.icon_size,
                height: self.icon_size,
                alpha: marker.opacity,
            },
            DrawCommand::Text {
                text: device.id.to_string(),
                at: PixelVec::new(x, y + ID_LABEL_OFFSET),
                align: TextAlign::Center,
                font_px: MARKER_FONT_PX,
                fill: MARKER_FILL,
                alpha: marker.opacity,
            },
            DrawCommand::Text {
                text: device.coords_label(),
                at: PixelVec::new(x, y + COORDS_LABEL_OFFSET),
                align: TextAlign::Center,
                font_px: MARKER_FONT_PX,
                fill: MARKER_FILL,
                alpha: marker.opacity,
            },
        ]
    }
}

/// Pin `raw` inside the surface, keeping `border / 2` horizontally and
/// `border` vertically. Returns the pinned point and whether it was already inside.
pub fn clamp_to_surface(raw: PixelVec, border: f64, surface: &Surface) -> (PixelVec, bool) {
    if border <= 0.0 {
        return (raw, true);
    }
    let pinned = PixelVec::new(
        clamp(raw.x, border / 2.0, surface.width - border / 2.0),
        clamp(raw.y, border, surface.height - border),
    );
    (pinned, pinned == raw)
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtls_core::RealVec;

    fn setup() -> (Viewport, Surface, IconRegistry) {
        let surface = Surface::new(640.0, 640.0).unwrap();
        let viewport = Viewport::new(0.5, PixelVec::new(213.3, 426.7));
        (viewport, surface, IconRegistry::default())
    }

    #[test]
    fn test_invalid_icon_size() {
        for &size in &[0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    MarkerProjector::new(size, 50.0),
                    Err(RenderError::InvalidIconSize { .. })
                ),
                "size {}",
                size
            );
        }
        assert_eq!(MarkerProjector::new(50.0, 50.0), Ok(MarkerProjector::default()));
        assert!(MarkerProjector::new(32.0, 0.0).is_ok());
    }

    #[test]
    fn test_origin_on_screen() {
        let (vp, surface, icons) = setup();
        let marker = MarkerProjector::default().project(
            &Device::new(1, RealVec::new(0.0, 0.0)),
            &vp,
            &surface,
            &icons,
        );
        assert!((marker.anchor.x - 213.3).abs() < 1e-9);
        assert!((marker.anchor.y - 426.7).abs() < 1e-9);
        assert!(marker.on_screen);
        assert_eq!(marker.opacity, 1.0);
    }

    #[test]
    fn test_far_device_pinned_and_dimmed() {
        let (vp, surface, icons) = setup();
        let marker = MarkerProjector::default().project(
            &Device::new(1, RealVec::new(2000.0, 2000.0)),
            &vp,
            &surface,
            &icons,
        );
        assert!((marker.raw.x - 1213.3).abs() < 1e-9);
        assert!((marker.raw.y + 573.3).abs() < 1e-9);
        assert!((marker.anchor.x - 615.0).abs() < 1e-9);
        assert!((marker.anchor.y - 50.0).abs() < 1e-9);
        assert!(!marker.on_screen);
        assert_eq!(marker.opacity, 0.2);
    }

    #[test]
    fn test_clamp_bounds() {
        let surface = Surface::new(300.0, 200.0).unwrap();
        let border = 40.0;
        for &(x, y) in &[
            (-1e6, -1e6),
            (1e6, 1e6),
            (150.0, 100.0),
            (20.0, 40.0),
            (19.9, 100.0),
            (280.0, 160.0),
            (280.1, 160.1),
        ] {
            let raw = PixelVec::new(x, y);
            let (p, on_screen) = clamp_to_surface(raw, border, &surface);
            assert!(p.x >= 20.0 && p.x <= 280.0);
            assert!(p.y >= 40.0 && p.y <= 160.0);
            let inside = (20.0..=280.0).contains(&x) && (40.0..=160.0).contains(&y);
            assert_eq!(on_screen, inside, "({}, {})", x, y);
        }
    }

    #[test]
    fn test_non_positive_border_is_identity() {
        let surface = Surface::new(100.0, 100.0).unwrap();
        let raw = PixelVec::new(-500.0, 900.0);
        assert_eq!(clamp_to_surface(raw, 0.0, &surface), (raw, true));
        assert_eq!(clamp_to_surface(raw, -5.0, &surface), (raw, true));
    }

    #[test]
    fn test_icon_is_stable_per_id() {
        let (vp, surface, icons) = setup();
        let projector = MarkerProjector::default();
        let a = projector.project(&Device::new(6, RealVec::new(1.0, 1.0)), &vp, &surface, &icons);
        let b = projector.project(&Device::new(6, RealVec::new(-90.0, 4.0)), &vp, &surface, &icons);
        assert_eq!(a.icon_index, 2);
        assert_eq!(a.icon_index, b.icon_index);
    }

    #[test]
    fn test_draw_layout() {
        let (vp, surface, icons) = setup();
        let device = Device::new(3, RealVec::new(0.0, 0.0));
        let commands = MarkerProjector::default().draw(&device, &vp, &surface, &icons);
        assert_eq!(commands.len(), 3);
        match &commands[0] {
            DrawCommand::Image { origin, width, source, alpha, .. } => {
                assert!((origin.x - (213.3 - 25.0)).abs() < 1e-9);
                assert!((origin.y - (426.7 - 50.0)).abs() < 1e-9);
                assert_eq!(*width, 50.0);
                assert_eq!(source, "/icons/avatars/w2.svg");
                assert_eq!(*alpha, 1.0);
            }
            other => panic!("expected image, got {:?}", other),
        }
        match &commands[2] {
            DrawCommand::Text { text, at, .. } => {
                assert_eq!(text, "0:0");
                assert!((at.y - (426.7 + 45.0)).abs() < 1e-9);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }
}

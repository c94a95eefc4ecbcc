use serde::{Deserialize, Serialize};

use rtls_core::PixelVec;

use crate::grid::GridSpec;
use crate::viewport::{Surface, Viewport};

/// Stroke colour of gridlines, grid labels and the border.
pub const GRID_STROKE: Rgb = Rgb::from_hex(0xEEEEEE);
/// Fill colour of marker labels.
pub const MARKER_FILL: Rgb = Rgb::from_hex(0x121540);
pub const GRID_FONT_PX: f32 = 12.0;
pub const MARKER_FONT_PX: f32 = 25.0;

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

/// A single drawing operation for the bitmap surface, in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Clear the whole surface.
    Clear { width: f64, height: f64 },
    Line {
        from: PixelVec,
        to: PixelVec,
        stroke: Rgb,
    },
    StrokeRect {
        origin: PixelVec,
        width: f64,
        height: f64,
        stroke: Rgb,
    },
    Text {
        text: String,
        at: PixelVec,
        align: TextAlign,
        font_px: f32,
        fill: Rgb,
        alpha: f32,
    },
    /// Draw icon `icon` (index into the icon registry) into the given box.
    Image {
        icon: usize,
        source: String,
        origin: PixelVec,
        width: f64,
        height: f64,
        alpha: f32,
    },
}

/// Complete frame handed from the renderer to the host surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub surface: Surface,
    pub viewport: Viewport,
    pub grid: GridSpec,
    /// Visible real-world area: [min_x, min_y, max_x, max_y]
    pub visible_bounds: [f64; 4],
    pub device_count: usize,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

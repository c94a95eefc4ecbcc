//! Adaptive coordinate grid.
//!
//! The grid spacing is picked from the "nice" numbers `{1, 2, 5, 10} x 10^n` so
//! that lines land roughly every [`DEFAULT_TARGET_SPACING`] pixels whatever the
//! zoom. Line positions are phase-locked to the real-world origin, so the grid
//! slides with the map while panning instead of staying glued to the screen.

use serde::{Deserialize, Serialize};

use rtls_core::geometry::round_to_step;
use rtls_core::PixelVec;

use crate::error::RenderError;
use crate::render_data::{DrawCommand, TextAlign, GRID_FONT_PX, GRID_STROKE};
use crate::viewport::{Surface, Viewport};

/// Desired on-screen distance between gridlines, in pixels.
pub const DEFAULT_TARGET_SPACING: f64 = 10.0;
/// Largest accepted target spacing. The number of lines per axis grows with
/// the target, so this keeps a frame at a few thousand lines at most.
pub const MAX_TARGET_SPACING: f64 = 1000.0;

/// Column labels sit this far above the bottom edge.
const COLUMN_LABEL_INSET: f64 = 6.0;

/// Grid spacing for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Real-world distance between lines.
    pub real_resolution: f64,
    /// On-screen distance between lines.
    pub pixel_resolution: f64,
}

/// Where the first gridline of an axis falls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStart {
    /// Real-world coordinate of the first line at or before the visible edge.
    /// This is the phase reference only; line labels are computed from
    /// [`Viewport::to_real`] at each line's pixel position.
    pub real: f64,
    /// Pixel position of the first line, in `(0, pixel_resolution]`.
    pub pixels: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Vertical lines, labelled with X coordinates.
    Column,
    /// Horizontal lines, labelled with Y coordinates.
    Row,
}

/// One gridline with its real-world label value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub axis: Axis,
    /// X for columns, Y for rows.
    pub pixel: f64,
    pub label: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPlanner {
    pub target_pixel_spacing: f64,
}

impl Default for GridPlanner {
    fn default() -> Self {
        Self {
            target_pixel_spacing: DEFAULT_TARGET_SPACING,
        }
    }
}

impl GridPlanner {
    /// Fails unless the target lies in `(0, MAX_TARGET_SPACING]`.
    pub fn new(target_pixel_spacing: f64) -> Result<Self, RenderError> {
        if !(target_pixel_spacing > 0.0 && target_pixel_spacing <= MAX_TARGET_SPACING) {
            return Err(RenderError::InvalidGridSpacing {
                spacing: target_pixel_spacing,
                max: MAX_TARGET_SPACING,
            });
        }
        Ok(Self {
            target_pixel_spacing,
        })
    }

    /// Pick the grid spacing for the current zoom.
    pub fn resolution(&self, viewport: &Viewport, surface: &Surface) -> GridSpec {
        let range = surface.width / viewport.zoom / self.target_pixel_spacing;
        let exponent = range.log10().floor() as i32;
        let magnitude = 10f64.powi(exponent);
        let fraction = range / magnitude;

        let real_resolution = nice_fraction(fraction) * magnitude;
        GridSpec {
            real_resolution,
            pixel_resolution: real_resolution * viewport.zoom,
        }
    }

    /// Phase of the first gridline for an axis whose origin sits at `offset_pix`.
    pub fn start_offset(&self, offset_pix: f64, zoom: f64, spec: &GridSpec) -> AxisStart {
        let off_real = offset_pix / zoom;
        let real = (-off_real / spec.real_resolution).floor() * spec.real_resolution;

        let mut pixels = offset_pix % spec.pixel_resolution;
        if pixels <= 0.0 {
            pixels += spec.pixel_resolution;
        }
        AxisStart { real, pixels }
    }

    /// Every column and row line visible on `surface`, columns first.
    pub fn lines(&self, viewport: &Viewport, surface: &Surface) -> Vec<GridLine> {
        let spec = self.resolution(viewport, surface);
        let x_start = self.start_offset(viewport.offset.x, viewport.zoom, &spec);
        let y_start = self.start_offset(viewport.offset.y, viewport.zoom, &spec);

        let mut lines = Vec::new();
        let columns = surface.width / spec.pixel_resolution;
        let mut col = 0.0;
        while col < columns {
            let pixel = col * spec.pixel_resolution + x_start.pixels;
            let real = viewport.to_real(PixelVec::new(pixel, 0.0)).x;
            lines.push(GridLine {
                axis: Axis::Column,
                pixel,
                label: round_to_step(real, spec.real_resolution),
            });
            col += 1.0;
        }

        let rows = surface.height / spec.pixel_resolution;
        let mut row = 0.0;
        while row < rows {
            let pixel = row * spec.pixel_resolution + y_start.pixels;
            let real = viewport.to_real(PixelVec::new(0.0, pixel)).y;
            lines.push(GridLine {
                axis: Axis::Row,
                pixel,
                label: round_to_step(real, spec.real_resolution),
            });
            row += 1.0;
        }
        lines
    }

    /// Draw commands for the grid, its labels and the surface border.
    pub fn draw(&self, viewport: &Viewport, surface: &Surface) -> Vec<DrawCommand> {
        let spec = self.resolution(viewport, surface);
        let mut commands = Vec::new();

        for line in self.lines(viewport, surface) {
            let text = format_label(line.label, spec.real_resolution);
            match line.axis {
                Axis::Column => {
                    commands.push(DrawCommand::Line {
                        from: PixelVec::new(line.pixel, 0.0),
                        to: PixelVec::new(line.pixel, surface.height),
                        stroke: GRID_STROKE,
                    });
                    commands.push(DrawCommand::Text {
                        text,
                        at: PixelVec::new(line.pixel, surface.height - COLUMN_LABEL_INSET),
                        align: TextAlign::Left,
                        font_px: GRID_FONT_PX,
                        fill: GRID_STROKE,
                        alpha: 1.0,
                    });
                }
                Axis::Row => {
                    commands.push(DrawCommand::Line {
                        from: PixelVec::new(0.0, line.pixel),
                        to: PixelVec::new(surface.width, line.pixel),
                        stroke: GRID_STROKE,
                    });
                    commands.push(DrawCommand::Text {
                        text,
                        at: PixelVec::new(0.0, line.pixel),
                        align: TextAlign::Left,
                        font_px: GRID_FONT_PX,
                        fill: GRID_STROKE,
                        alpha: 1.0,
                    });
                }
            }
        }

        commands.push(DrawCommand::StrokeRect {
            origin: PixelVec::new(0.0, 0.0),
            width: surface.width,
            height: surface.height,
            stroke: GRID_STROKE,
        });
        commands
    }
}

/// Round a normalized fraction in `[1, 10)` to 1, 2, 5 or 10.
pub fn nice_fraction(fraction: f64) -> f64 {
    if fraction < 1.5 {
        1.0
    } else if fraction < 3.0 {
        2.0
    } else if fraction < 7.0 {
        5.0
    } else {
        10.0
    }
}

/// Format a label with just enough decimals for the grid resolution.
pub fn format_label(value: f64, resolution: f64) -> String {
    let decimals = if resolution >= 1.0 {
        0
    } else {
        (-resolution.log10() - 1e-9).ceil() as usize
    };
    let text = format!("{:.*}", decimals, value);
    // A tiny negative value would otherwise print as "-0".
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

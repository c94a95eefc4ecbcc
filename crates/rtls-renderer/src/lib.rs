//! # RTLS Renderer
//!
//! Turns the device map into draw commands for a fixed-size bitmap surface:
//! the viewport transform, the adaptive coordinate grid, edge-pinned device
//! markers, pointer/wheel handling, and the per-frame render loop.
//!
//! Frames are plain serializable data ([`RenderFrame`]); painting them onto a
//! real canvas is the host's job.

pub mod error;
pub mod grid;
pub mod icons;
pub mod input;
pub mod marker;
pub mod render_data;
pub mod render_loop;
pub mod viewport;

pub use error::RenderError;
pub use grid::{GridPlanner, GridSpec};
pub use icons::IconRegistry;
pub use input::{InputController, InputEvent, PanState};
pub use marker::{Marker, MarkerProjector};
pub use render_data::{DrawCommand, RenderFrame};
pub use render_loop::RenderLoop;
pub use viewport::{Surface, Viewport};

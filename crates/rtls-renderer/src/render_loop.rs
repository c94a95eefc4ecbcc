use rtls_core::DeviceStore;

use crate::grid::GridPlanner;
use crate::icons::IconRegistry;
use crate::marker::MarkerProjector;
use crate::render_data::{DrawCommand, RenderFrame};
use crate::viewport::{Surface, Viewport};

/// Produces one frame per tick from the current viewport and device store.
///
/// Holds only immutable configuration; the host decides when the next tick
/// happens.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    surface: Surface,
    grid: GridPlanner,
    markers: MarkerProjector,
    icons: IconRegistry,
}

impl RenderLoop {
    pub fn new(
        surface: Surface,
        grid: GridPlanner,
        markers: MarkerProjector,
        icons: IconRegistry,
    ) -> Self {
        Self {
            surface,
            grid,
            markers,
            icons,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Clear, draw the grid, then one marker per stored device.
    pub fn tick(&self, viewport: &Viewport, store: &DeviceStore) -> RenderFrame {
        let mut commands = vec![DrawCommand::Clear {
            width: self.surface.width,
            height: self.surface.height,
        }];
        commands.extend(self.grid.draw(viewport, &self.surface));
        for device in store.iter() {
            commands.extend(self.markers.draw(device, viewport, &self.surface, &self.icons));
        }

        let (min, max) = viewport.visible_bounds(&self.surface);
        RenderFrame {
            surface: self.surface,
            viewport: *viewport,
            grid: self.grid.resolution(viewport, &self.surface),
            visible_bounds: [min.x, min.y, max.x, max.y],
            device_count: store.len(),
            commands,
        }
    }
}

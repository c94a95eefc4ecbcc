use serde::{Deserialize, Serialize};

use crate::geometry::RealVec;

/// Stable device identifier as assigned by the locating server.
pub type DeviceId = u32;

/// Server-side activity timestamp, passed through untouched.
pub type Timestamp = u32;

/// The latest known state of one tracked device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Estimated position in real-world space.
    pub position: RealVec,
    /// Last activity timestamp reported alongside the position, if any.
    pub timestamp: Option<Timestamp>,
}

impl Device {
    pub fn new(id: DeviceId, position: RealVec) -> Self {
        Self {
            id,
            position,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Coordinates rounded for display, formatted as `x:y`.
    pub fn coords_label(&self) -> String {
        format!(
            "{}:{}",
            crate::geometry::round_half_up(self.position.x) + 0.0,
            crate::geometry::round_half_up(self.position.y) + 0.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_label_rounds() {
        let dev = Device::new(7, RealVec::new(12.4, -3.5));
        assert_eq!(dev.coords_label(), "12:-3");
    }

    #[test]
    fn test_coords_label_no_negative_zero() {
        let dev = Device::new(1, RealVec::new(-0.3, 0.0));
        assert_eq!(dev.coords_label(), "0:0");
    }

    #[test]
    fn test_with_timestamp() {
        let dev = Device::new(3, RealVec::new(1.0, 2.0)).with_timestamp(99);
        assert_eq!(dev.timestamp, Some(99));
    }
}

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A position in real-world space (device units, Y increasing upward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RealVec {
    pub x: f64,
    pub y: f64,
}

impl RealVec {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position or displacement in pixel space (origin top-left, Y increasing downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelVec {
    pub x: f64,
    pub y: f64,
}

impl PixelVec {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for PixelVec {
    type Output = PixelVec;

    fn add(self, rhs: PixelVec) -> PixelVec {
        PixelVec::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for PixelVec {
    fn add_assign(&mut self, rhs: PixelVec) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for PixelVec {
    type Output = PixelVec;

    fn sub(self, rhs: PixelVec) -> PixelVec {
        PixelVec::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Round to the nearest integer with halves going toward positive infinity.
///
/// `f64::round` sends halves away from zero, which would label `-2.5` as `-3`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round `value` to the nearest multiple of `step` (half-up).
pub fn round_to_step(value: f64, step: f64) -> f64 {
    // `+ 0.0` folds a negative zero into positive zero.
    round_half_up(value / step) * step + 0.0
}

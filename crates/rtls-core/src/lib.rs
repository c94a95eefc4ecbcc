//! # RTLS Core
//!
//! Data model shared by the map renderer and the feed: real-world and
//! pixel-space vectors, device records, and the device store that holds the
//! latest known record per device.

pub mod device;
pub mod geometry;
pub mod store;

pub use device::{Device, DeviceId, Timestamp};
pub use geometry::{PixelVec, RealVec};
pub use store::DeviceStore;

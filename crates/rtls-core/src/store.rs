use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceId};

/// The latest known record for every device seen on the feed.
///
/// Records are keyed by id and iterate in ascending id order, so two stores
/// with the same contents always render the same frame. Nothing is ever
/// removed: a device that stops reporting keeps its last position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStore {
    devices: BTreeMap<DeviceId, Device>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self {
            devices: BTreeMap::new(),
        }
    }

    /// Insert or replace a single record. Returns the record it replaced.
    pub fn upsert(&mut self, device: Device) -> Option<Device> {
        self.devices.insert(device.id, device)
    }

    /// Upsert every record of a batch in order; later records for the same id win.
    ///
    /// Returns the number of records applied.
    pub fn apply_batch<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = Device>,
    {
        let mut applied = 0;
        for device in records {
            self.upsert(device);
            applied += 1;
        }
        debug!("applied {} device records, {} devices known", applied, self.len());
        applied
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// All devices in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }
}

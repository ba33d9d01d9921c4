//! Partitioning of the loaded dataset into fixed-size batches.

use serde::Serialize;
use tracing::info;

use crate::dataset::DeviceMap;
use crate::errors::{Error, Result};

/// A contiguous run of devices from the dataset, served together as one response.
///
/// Serializes as the plain `{device_id: payload}` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Batch {
    devices: DeviceMap,
}

impl Batch {
    pub fn new(devices: DeviceMap) -> Self {
        Self { devices }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> &DeviceMap {
        &self.devices
    }

    /// Device ids in this batch, in dataset order
    pub fn device_ids(&self) -> Vec<String> {
        self.devices.keys().cloned().collect()
    }
}

/// Split `devices` into consecutive batches of `devices_per_batch`, keeping dataset order.
///
/// Every batch is full except possibly the last, which holds the remainder. An empty dataset
/// yields no batches.
pub fn partition(devices: DeviceMap, devices_per_batch: usize) -> Result<Vec<Batch>> {
    if devices_per_batch == 0 {
        return Err(Error::Configuration {
            message: "devices_per_batch must be greater than 0".to_string(),
        });
    }

    let mut batches = Vec::with_capacity(devices.len().div_ceil(devices_per_batch));
    let mut current = DeviceMap::new();

    for (id, payload) in devices {
        current.insert(id, payload);
        if current.len() == devices_per_batch {
            batches.push(Batch::new(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        batches.push(Batch::new(current));
    }

    info!("Created {} batches of {} devices each", batches.len(), devices_per_batch);
    for (index, batch) in batches.iter().enumerate() {
        info!("Batch {}: {:?}", index, batch.device_ids());
    }

    Ok(batches)
}

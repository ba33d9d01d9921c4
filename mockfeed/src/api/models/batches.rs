use serde::Serialize;
use utoipa::ToSchema;

use crate::batching::Batch;
use crate::dataset::DeviceMap;

/// The current batch: an object of device id to that device's payload.
///
/// Payloads are returned exactly as loaded from the data file.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct BatchResponse(pub DeviceMap);

impl From<&Batch> for BatchResponse {
    fn from(batch: &Batch) -> Self {
        Self(batch.devices().clone())
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership of a single batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchDetail {
    pub batch_index: usize,
    pub device_count: usize,
    pub device_ids: Vec<String>,
}

/// Every loaded device and the batch it belongs to, for debugging feeds.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DevicesResponse {
    pub total_devices: usize,
    pub total_batches: usize,
    pub devices_per_batch: usize,
    pub current_batch: usize,
    /// All device ids in rotation order
    pub all_devices: Vec<String>,
    pub batch_details: Vec<BatchDetail>,
}

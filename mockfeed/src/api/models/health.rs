use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// At least one batch is loaded and being served
    Ok,
    /// The dataset failed to load or was empty; nothing is served
    Degraded,
}

/// Aggregate view of what the server is currently serving.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Devices across all batches
    pub total_devices: usize,
    pub total_batches: usize,
    pub devices_per_batch: usize,
    /// Index of the batch currently served by `/data`
    pub current_batch: usize,
    /// Device ids in the current batch (empty when nothing is loaded)
    pub current_devices: Vec<String>,
}

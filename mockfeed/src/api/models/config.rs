use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Config;

/// The static settings the feed was started with.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    pub devices_per_response: usize,
    /// Time between rotations, in seconds (fractional for sub-second intervals)
    pub rotation_interval_seconds: f64,
    pub data_file: String,
}

impl From<&Config> for ConfigResponse {
    fn from(config: &Config) -> Self {
        Self {
            devices_per_response: config.devices_per_batch,
            rotation_interval_seconds: config.rotation_interval.as_secs_f64(),
            data_file: config.data_file.display().to_string(),
        }
    }
}

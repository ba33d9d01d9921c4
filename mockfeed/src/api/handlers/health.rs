//! HTTP handler for the feed's health summary.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::health::{HealthResponse, HealthStatus},
};

#[utoipa::path(
    get,
    path = "/health",
    tag = "diagnostics",
    summary = "Get health",
    description = "Counts of loaded devices and batches, and the batch currently being served",
    responses(
        (status = 200, description = "Health summary", body = HealthResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = &state.store;

    let (status, current_batch, current_devices) = match store.current() {
        Ok(current) => (HealthStatus::Ok, current.index, current.batch.device_ids()),
        Err(_) => (HealthStatus::Degraded, store.current_index(), Vec::new()),
    };

    Json(HealthResponse {
        status,
        total_devices: store.total_devices(),
        total_batches: store.len(),
        devices_per_batch: state.config.devices_per_batch,
        current_batch,
        current_devices,
    })
}

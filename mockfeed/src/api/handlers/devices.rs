//! HTTP handler listing every loaded device.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::devices::{BatchDetail, DevicesResponse},
};

#[utoipa::path(
    get,
    path = "/devices",
    tag = "diagnostics",
    summary = "List devices",
    description = "All loaded device ids, plus the membership of each batch",
    responses(
        (status = 200, description = "Loaded devices", body = DevicesResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_devices(State(state): State<AppState>) -> Json<DevicesResponse> {
    let store = &state.store;

    let batch_details: Vec<BatchDetail> = store
        .batches()
        .iter()
        .enumerate()
        .map(|(batch_index, batch)| BatchDetail {
            batch_index,
            device_count: batch.len(),
            device_ids: batch.device_ids(),
        })
        .collect();

    let all_devices: Vec<String> = batch_details.iter().flat_map(|detail| detail.device_ids.iter().cloned()).collect();

    Json(DevicesResponse {
        total_devices: all_devices.len(),
        total_batches: store.len(),
        devices_per_batch: state.config.devices_per_batch,
        current_batch: store.current_index(),
        all_devices,
        batch_details,
    })
}

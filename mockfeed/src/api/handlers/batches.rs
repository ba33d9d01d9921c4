//! HTTP handler for the rotating data feed.

use axum::{Json, extract::State};
use tracing::debug;

use crate::{AppState, api::models::batches::BatchResponse, errors::Result};

#[utoipa::path(
    get,
    path = "/data",
    tag = "feed",
    summary = "Get current batch",
    description = "Returns the devices in the batch currently being served, keyed by device id",
    responses(
        (status = 200, description = "Current batch", body = BatchResponse),
        (status = 500, description = "No data loaded"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_batch(State(state): State<AppState>) -> Result<Json<BatchResponse>> {
    let current = state.store.current()?;
    debug!(
        "Serving batch {} with {} devices: {:?}",
        current.index,
        current.batch.len(),
        current.batch.device_ids()
    );

    Ok(Json(BatchResponse::from(current.batch)))
}

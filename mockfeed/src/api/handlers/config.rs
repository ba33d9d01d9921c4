//! HTTP handler for configuration retrieval.

use axum::{Json, extract::State};

use crate::{AppState, api::models::config::ConfigResponse};

#[utoipa::path(
    get,
    path = "/config",
    tag = "diagnostics",
    summary = "Get config",
    description = "The batch size, rotation interval and data file this server was started with",
    responses(
        (status = 200, description = "Startup configuration", body = ConfigResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(&state.config))
}

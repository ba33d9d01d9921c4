//! OpenAPI document for the query endpoints, served with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "mockfeed",
        description = "Mock device-telemetry feed serving one rotating batch of a fixed dataset"
    ),
    paths(
        handlers::batches::get_current_batch,
        handlers::health::get_health,
        handlers::devices::list_devices,
        handlers::config::get_config,
    ),
    components(schemas(
        models::batches::BatchResponse,
        models::health::HealthResponse,
        models::health::HealthStatus,
        models::devices::DevicesResponse,
        models::devices::BatchDetail,
        models::config::ConfigResponse,
    )),
    tags(
        (name = "feed", description = "The rotating device feed"),
        (name = "diagnostics", description = "Introspection of the loaded dataset and rotation state"),
    )
)]
pub struct ApiDoc;

//! Shared helpers for handler and end-to-end tests.

use axum_test::TestServer;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dataset::DeviceMap;
use crate::store::BatchStore;
use crate::{Application, BackgroundServices};

/// Config with a rotation interval long enough that no test sees an automatic rotation
/// unless it drives time forward itself.
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_file: PathBuf::from("test_devices.json"),
        devices_per_batch: 5,
        rotation_interval: Duration::from_secs(3600),
        enable_metrics: false,
        enable_otel_export: false,
    }
}

/// `count` devices named `device-000`, `device-001`, ... in that order
pub fn sample_devices(count: usize) -> DeviceMap {
    (0..count)
        .map(|seq| (format!("device-{seq:03}"), json!({ "temperature": 20.5, "seq": seq })))
        .collect()
}

pub async fn create_test_app(devices: DeviceMap) -> (TestServer, Arc<BatchStore>, BackgroundServices) {
    create_test_app_with_config(create_test_config(), devices).await
}

pub async fn create_test_app_with_config(config: Config, devices: DeviceMap) -> (TestServer, Arc<BatchStore>, BackgroundServices) {
    let app = Application::with_devices(config, devices)
        .await
        .expect("Failed to create application");
    let store = app.store();
    let (server, bg_services) = app.into_test_server();
    (server, store, bg_services)
}

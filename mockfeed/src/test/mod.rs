//! End-to-end tests: a full application with a live rotation clock, driven over HTTP.

use std::io::Write;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::Application;
use crate::api::models::devices::DevicesResponse;
use crate::api::models::health::{HealthResponse, HealthStatus};
use crate::config::Config;
use crate::test_utils::{create_test_app, create_test_app_with_config, create_test_config, sample_devices};

const INTERVAL: Duration = Duration::from_secs(10);

fn rotating_config() -> Config {
    Config {
        rotation_interval: INTERVAL,
        ..create_test_config()
    }
}

fn keys(value: &Value) -> Vec<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

/// 12 devices in batches of 5: three batches of [5, 5, 2], visited in order and wrapping.
#[test_log::test(tokio::test(start_paused = true))]
async fn test_e2e_twelve_devices_rotate_through_three_batches() {
    let (server, _store, _bg_services) = create_test_app_with_config(rotating_config(), sample_devices(12)).await;

    let devices: DevicesResponse = server.get("/devices").await.json();
    let sizes: Vec<usize> = devices.batch_details.iter().map(|d| d.device_count).collect();
    assert_eq!(sizes, vec![5, 5, 2]);

    // Stay half an interval off the tick grid
    tokio::time::sleep(INTERVAL / 2).await;
    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.current_batch, 0);
    assert_eq!(keys(&server.get("/data").await.json()), devices.batch_details[0].device_ids);

    tokio::time::sleep(INTERVAL).await;
    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.current_batch, 1);
    assert_eq!(health.current_devices.len(), 5);
    assert_eq!(keys(&server.get("/data").await.json()), devices.batch_details[1].device_ids);

    tokio::time::sleep(INTERVAL).await;
    let data: Value = server.get("/data").await.json();
    assert_eq!(keys(&data), vec!["device-010", "device-011"]);

    tokio::time::sleep(INTERVAL).await;
    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.current_batch, 0);
}

/// No devices: every endpoint answers, `/data` with the no-data indicator.
#[tokio::test(start_paused = true)]
async fn test_e2e_empty_dataset_is_degraded_not_broken() {
    let (server, _store, _bg_services) = create_test_app_with_config(rotating_config(), Default::default()).await;

    tokio::time::sleep(INTERVAL * 3).await;

    let response = server.get("/data").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "No data loaded" }));

    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.status, HealthStatus::Degraded);
    assert_eq!(health.total_devices, 0);
    assert_eq!(health.total_batches, 0);

    server.get("/devices").await.assert_status_ok();
    server.get("/config").await.assert_status_ok();
}

/// Fewer devices than a batch: one batch holding all of them, and rotation never moves.
#[tokio::test(start_paused = true)]
async fn test_e2e_single_batch_never_rotates() {
    let (server, _store, _bg_services) = create_test_app_with_config(rotating_config(), sample_devices(3)).await;

    tokio::time::sleep(INTERVAL / 2).await;
    for _ in 0..5 {
        let health: HealthResponse = server.get("/health").await.json();
        assert_eq!(health.total_batches, 1);
        assert_eq!(health.current_batch, 0);
        assert_eq!(health.current_devices, vec!["device-000", "device-001", "device-002"]);

        tokio::time::sleep(INTERVAL * 7).await;
    }
}

#[tokio::test]
async fn test_e2e_unreadable_data_file_starts_degraded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"this is not json").unwrap();

    let config = Config {
        data_file: file.path().to_path_buf(),
        ..create_test_config()
    };
    let app = Application::new(config).await.expect("a bad data file must not abort startup");
    let (server, _bg_services) = app.into_test_server();

    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.status, HealthStatus::Degraded);

    let config: Value = server.get("/config").await.json();
    assert_eq!(config["data_file"], json!(file.path().display().to_string()));

    server.get("/data").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_e2e_loads_data_file_in_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"sensor-b": {"rssi": -40}, "sensor-a": {"rssi": -71}, "sensor-c": null}"#)
        .unwrap();

    let config = Config {
        data_file: file.path().to_path_buf(),
        devices_per_batch: 2,
        ..create_test_config()
    };
    let (server, _bg_services) = Application::new(config).await.unwrap().into_test_server();

    let data: Value = server.get("/data").await.json();
    assert_eq!(data, json!({ "sensor-b": { "rssi": -40 }, "sensor-a": { "rssi": -71 } }));

    let devices: DevicesResponse = server.get("/devices").await.json();
    assert_eq!(devices.all_devices, vec!["sensor-b", "sensor-a", "sensor-c"]);
}

#[tokio::test]
async fn test_zero_batch_size_aborts_startup() {
    let config = Config {
        devices_per_batch: 0,
        ..create_test_config()
    };

    assert!(Application::with_devices(config, sample_devices(3)).await.is_err());
}

/// Reads racing a fast real-time clock always see a whole batch that matches its index.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_e2e_reads_during_rotation_are_consistent() {
    let config = Config {
        rotation_interval: Duration::from_millis(1),
        ..create_test_config()
    };
    let (server, store, _bg_services) = create_test_app_with_config(config, sample_devices(23)).await;

    let batch_ids: Vec<Vec<String>> = store.batches().iter().map(|b| b.device_ids()).collect();

    for _ in 0..200 {
        let data: Value = server.get("/data").await.json();
        assert!(batch_ids.contains(&keys(&data)));

        let health: HealthResponse = server.get("/health").await.json();
        assert!(health.current_batch < batch_ids.len());
        assert_eq!(health.current_devices, batch_ids[health.current_batch]);
    }
}

#[tokio::test]
async fn test_liveness_and_docs() {
    let (server, _store, _bg_services) = create_test_app(sample_devices(1)).await;

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("OK");

    server.get("/docs").await.assert_status_ok();
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let (server, _store, _bg_services) = create_test_app(sample_devices(1)).await;

    server.get("/internal/metrics").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_metrics_record_rotations() {
    let config = Config {
        enable_metrics: true,
        ..rotating_config()
    };
    let (server, store, _bg_services) = create_test_app_with_config(config, sample_devices(12)).await;

    tokio::time::sleep(INTERVAL / 2 + INTERVAL * 2).await;
    assert_eq!(store.current_index(), 2);

    let response = server.get("/internal/metrics").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("mockfeed_rotations_total"), "missing rotation counter in:\n{body}");
    assert!(body.contains("mockfeed_current_batch"), "missing current batch gauge in:\n{body}");
}

#[tokio::test(start_paused = true)]
async fn test_dropping_background_services_stops_rotation() {
    let (server, store, bg_services) = create_test_app_with_config(rotating_config(), sample_devices(12)).await;

    tokio::time::sleep(INTERVAL / 2 + INTERVAL).await;
    assert_eq!(store.current_index(), 1);

    drop(bg_services);
    tokio::time::sleep(INTERVAL * 5).await;

    assert_eq!(store.current_index(), 1);
    let health: HealthResponse = server.get("/health").await.json();
    assert_eq!(health.current_batch, 1);
}

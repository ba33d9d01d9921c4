//! # mockfeed: a rotating mock device-telemetry feed
//!
//! `mockfeed` stands in for a fleet of telemetry devices during integration testing. It loads a
//! fixed dataset of device payloads from a JSON file, splits it into fixed-size batches, and
//! serves one batch at a time over HTTP. A background clock moves to the next batch on a fixed
//! interval, wrapping back to the first, so a downstream poller sees a changing set of devices
//! without any real hardware online.
//!
//! ## Architecture
//!
//! Data flows one way, once, at startup: the [`dataset`] loader reads the file, [`batching`]
//! partitions it, and the result is frozen inside a [`store::BatchStore`]. From then on the only
//! thing that changes is the store's current index, advanced by the [`rotation::RotationClock`]
//! and read by the [`api`] handlers. The index is a single atomic, so handlers never block on the
//! clock and never observe a half-applied rotation.
//!
//! If the dataset can't be loaded the server still starts, with no batches. `/data` then answers
//! with a "No data loaded" error and `/health` reports `degraded`, which keeps a misconfigured
//! feed visible instead of crash-looping it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use mockfeed::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = mockfeed::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     mockfeed::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod batching;
pub mod config;
pub mod dataset;
pub mod errors;
mod openapi;
pub mod rotation;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;

use axum::{Router, routing::get};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::dataset::DeviceMap;
use crate::openapi::ApiDoc;
use crate::rotation::RotationClock;
use crate::store::BatchStore;

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .store(Arc::new(BatchStore::new(batches)))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<BatchStore>,
}

/// Build the application router with all endpoints and middleware.
///
/// Routes:
/// - `/data`, `/health`, `/devices`, `/config` - the query endpoints
/// - `/healthz` - liveness probe
/// - `/docs` - OpenAPI documentation
/// - `/internal/metrics` - Prometheus metrics, when `enable_metrics` is set
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> Router {
    let enable_metrics = state.config.enable_metrics;

    let router = Router::new()
        .route("/data", get(api::handlers::batches::get_current_batch))
        .route("/health", get(api::handlers::health::get_health))
        .route("/devices", get(api::handlers::devices::list_devices))
        .route("/config", get(api::handlers::config::get_config))
        .route("/healthz", get(|| async { "OK" }))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let router = if enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router
            .route("/internal/metrics", get(move || std::future::ready(metric_handle.render())))
            .layer(prometheus_layer)
    } else {
        router
    };

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Tasks that run alongside the HTTP server.
///
/// Currently this is just the rotation clock. On shutdown its token is cancelled and the task is
/// abandoned rather than joined: it holds nothing that needs cleaning up. Dropping this struct
/// cancels the token too.
pub struct BackgroundServices {
    rotation_task: JoinHandle<()>,
    shutdown_token: CancellationToken,
    _cancel_on_drop: DropGuard,
}

impl BackgroundServices {
    /// Signal background tasks to stop, without waiting for them
    pub fn shutdown(self) {
        self.shutdown_token.cancel();
        if !self.rotation_task.is_finished() {
            debug!("Abandoning rotation clock task");
        }
    }
}

/// Start the rotation clock. It starts regardless of how many batches are loaded.
fn setup_background_services(store: Arc<BatchStore>, config: &Config, shutdown_token: CancellationToken) -> BackgroundServices {
    let cancel_on_drop = shutdown_token.clone().drop_guard();

    let rotation_task = RotationClock::new(store, config.rotation_interval).spawn(shutdown_token.clone());

    BackgroundServices {
        rotation_task,
        shutdown_token,
        _cancel_on_drop: cancel_on_drop,
    }
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] loads and batches the dataset, builds the store, and
///    starts the rotation clock
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, stops the clock and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    store: Arc<BatchStore>,
    bg_services: BackgroundServices,
}

impl Application {
    /// Create a new application, loading the dataset from `config.data_file`.
    ///
    /// A dataset that fails to load is logged and replaced by an empty one.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting mockfeed with configuration: {:#?}", config);

        let devices = dataset::load_or_empty(&config.data_file);
        Self::with_devices(config, devices).await
    }

    /// Create a new application serving an already-loaded dataset.
    ///
    /// Fails only on invalid configuration, e.g. a zero batch size.
    pub async fn with_devices(config: Config, devices: DeviceMap) -> anyhow::Result<Self> {
        let batches = batching::partition(devices, config.devices_per_batch)?;
        let store = Arc::new(BatchStore::new(batches));

        let shutdown_token = CancellationToken::new();
        let bg_services = setup_background_services(store.clone(), &config, shutdown_token);

        let app_state = AppState::builder().config(config.clone()).store(store.clone()).build();
        let router = build_router(app_state);

        Ok(Self {
            router,
            config,
            store,
            bg_services,
        })
    }

    /// Handle to the batch store backing this application
    pub fn store(&self) -> Arc<BatchStore> {
        self.store.clone()
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> (axum_test::TestServer, BackgroundServices) {
        let server = axum_test::TestServer::new(self.router).expect("Failed to create test server");
        (server, self.bg_services)
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "mockfeed listening on http://{}, serving {} batches of up to {} devices",
            bind_addr,
            self.store.len(),
            self.config.devices_per_batch
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        self.bg_services.shutdown();

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

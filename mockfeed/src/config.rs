//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `MOCKFEED_CONFIG`
//! environment variable. A missing file is fine: every field has a default.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `MOCKFEED_` override YAML values
//!
//! Everything here is fixed for the lifetime of the process; there is no reload.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use mockfeed::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Serving {} devices per batch from {}", config.devices_per_batch, config.data_file.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! MOCKFEED_PORT=9000
//! MOCKFEED_DATA_FILE=/data/devices.json
//! MOCKFEED_DEVICES_PER_BATCH=10
//! MOCKFEED_ROTATION_INTERVAL=1m
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::errors::Error;

/// Printed by `--validate` once the configuration has loaded and validated
pub const VALIDATION_OK: &str = "Configuration is valid.";

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "MOCKFEED_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults matching the feed this server stands in for: five devices per
/// batch, rotating every ten seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// JSON file holding an object of device id to device payload
    pub data_file: PathBuf,
    /// Number of devices in each served batch; must be positive
    pub devices_per_batch: usize,
    /// Time between automatic advances of the current batch (e.g. "10s", "1m")
    #[serde(with = "humantime_serde")]
    pub rotation_interval: Duration,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            data_file: PathBuf::from("fake_server_data.json"),
            devices_per_batch: 5,
            rotation_interval: Duration::from_secs(10),
            enable_metrics: false,
            enable_otel_export: false,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            // MOCKFEED_CONFIG names the file itself and is read by clap
            .merge(Env::prefixed("MOCKFEED_").ignore(&["config"]).split("__"))
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration. Any failure here aborts startup.
    pub fn validate(&self) -> Result<(), Error> {
        if self.devices_per_batch == 0 {
            return Err(Error::Configuration {
                message: "devices_per_batch must be greater than 0".to_string(),
            });
        }

        if self.rotation_interval.is_zero() {
            return Err(Error::Configuration {
                message: "rotation_interval must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

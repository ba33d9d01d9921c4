//! Loading the device dataset from disk.
//!
//! The data file is a single JSON object mapping device identifier to an arbitrary payload.
//! Payloads are opaque: they are served back exactly as read. Key order in the file is
//! preserved and determines batch membership.

use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument};

use crate::errors::{DatasetLoadCause, Error, Result};

/// Ordered mapping of device id to device payload, in file order.
pub type DeviceMap = serde_json::Map<String, Value>;

/// Read and parse the dataset at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<DeviceMap> {
    let contents = std::fs::read(path).map_err(|e| load_error(path, e.into()))?;
    let devices = parse(&contents).map_err(|cause| load_error(path, cause))?;

    info!("Loaded {} total devices", devices.len());
    Ok(devices)
}

/// Load the dataset, or fall back to an empty one when it can't be read.
///
/// An unreadable dataset leaves the server up with nothing to serve, which is visible on the
/// health and config endpoints.
pub fn load_or_empty(path: &Path) -> DeviceMap {
    match load(path) {
        Ok(devices) => devices,
        Err(e) => {
            tracing::error!("{}; continuing with no data", e);
            DeviceMap::new()
        }
    }
}

fn parse(contents: &[u8]) -> std::result::Result<DeviceMap, DatasetLoadCause> {
    match serde_json::from_slice::<Value>(contents)? {
        Value::Object(devices) => Ok(devices),
        other => Err(DatasetLoadCause::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

fn load_error(path: &Path, source: DatasetLoadCause) -> Error {
    Error::DatasetLoad {
        path: path.to_path_buf(),
        source,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

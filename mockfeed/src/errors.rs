use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Why a dataset file could not be turned into a device map.
#[derive(ThisError, Debug)]
pub enum DatasetLoadCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The file parsed, but its top level is not an object of device id to payload
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
}

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid startup configuration (e.g. a zero batch size). Fatal at startup.
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// The dataset file could not be read or parsed. Startup degrades to an empty store.
    #[error("Failed to load dataset from {}: {source}", .path.display())]
    DatasetLoad {
        path: PathBuf,
        #[source]
        source: DatasetLoadCause,
    },

    /// A read of the current batch while no batches are loaded
    #[error("No data loaded")]
    EmptyDataset,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::DatasetLoad { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            // Pollers of the real feed treat a 500 as "nothing to report"
            Error::EmptyDataset => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::EmptyDataset => "No data loaded".to_string(),
            Error::Configuration { .. } | Error::DatasetLoad { .. } => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::EmptyDataset => {
                tracing::warn!("Request for current batch while no data is loaded");
            }
            Error::Configuration { .. } | Error::DatasetLoad { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
        }

        let status = self.status_code();
        let body = serde_json::json!({ "error": self.user_message() });

        (status, Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

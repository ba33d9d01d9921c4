//! HTTP request handlers for the query endpoints.
//!
//! - [`batches`]: the current batch (`/data`)
//! - [`health`]: aggregate counts and the current batch's device ids (`/health`)
//! - [`devices`]: every device and its batch membership (`/devices`)
//! - [`config`]: the static startup configuration (`/config`)
//!
//! Handlers return [`crate::errors::Error`] on failure, which renders as a JSON error body.

pub mod batches;
pub mod config;
pub mod devices;
pub mod health;

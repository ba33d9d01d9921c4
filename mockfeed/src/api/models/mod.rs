//! Response bodies for the query endpoints, documented with `utoipa`.

pub mod batches;
pub mod config;
pub mod devices;
pub mod health;

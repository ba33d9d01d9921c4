//! Read-only HTTP surface over the batch store.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Response bodies
//!
//! Every handler is a projection of the store at the instant of the call. None of them take a
//! lock: the index is read once and the batches themselves never change.

pub mod handlers;
pub mod models;

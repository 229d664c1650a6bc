//! Axum query-parameter surface for the resource protocol.
//!
//! This crate turns raw list-endpoint query strings into the typed,
//! validated values `resource-core` defines: projection paths checked
//! against the model's field set, sort terms against its sort set, and
//! pagination parameters with the strategy selected and the limit clamped.
//! Route registration and handler wiring stay with the application.

pub mod error;
pub mod extract;
pub mod params;

pub use error::ApiError;
pub use extract::ResourceQuery;
pub use params::ListParams;

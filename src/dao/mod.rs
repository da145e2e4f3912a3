//! Data access layer: model records and pluggable storage backends.

pub mod memory;
pub mod models;
pub mod store;

//! An in-memory course and assignment management API.
//!
//! The [`store`] module holds the resource stores together with the filter
//! engine and the partial update merger. [`server`] exposes them over HTTP.

pub mod config;
pub mod models;
pub mod server;
pub mod store;
pub mod types;

pub use config::{ConfigError, ServerConfig};
pub use server::create_router;
pub use store::{Entity, Store, StoreError, StoreResult};
pub use types::AppState;

//! Catalog Graph Server library.
//!
//! The HTTP transport for the catalog engine, exposed as a library so the
//! CLI and the integration tests can reuse the GraphQL layer and the router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod routes;
pub mod snapshot;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::AppError;
pub use routes::router;
pub use snapshot::{LoadError, SnapshotError, load_engine};
pub use state::AppState;

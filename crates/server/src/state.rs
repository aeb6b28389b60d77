//! Application state shared across handlers.

use std::sync::Arc;

use catalog_graph_core::Engine;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The engine inside is fully loaded before the
/// state is built, so handlers never observe a partially populated store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    engine: Engine,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, engine: Engine) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, engine }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the query/mutation engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.inner.engine
    }
}

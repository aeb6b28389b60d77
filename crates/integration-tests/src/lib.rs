//! Integration tests for Catalog Graph.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-graph-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `engine_properties` - Query/mutation semantics through the public engine API
//! - `concurrency` - Per-product isolation under parallel mutations
//! - `http_graphql` - The axum router driven in-process with `oneshot`
//!
//! Everything runs in memory; no server or external service is needed.

use axum::Router;
use catalog_graph_core::{CatalogShape, Engine, KeyKind, ScalarKind, VariantShape};
use catalog_graph_server::{AppState, ServerConfig, router, snapshot};

/// The single-variant snapshot shipped with the repository.
pub const EXAMPLE_SNAPSHOT: &str = include_str!("../../../example_product.json");

/// A multi-variant snapshot with integer keys and numeric UPCs.
pub const MANY_SNAPSHOT: &str = r#"{
    "1": { "id": 1, "topCategory": 10, "variants": [
        { "status": 0, "upc": 111, "images": ["a"] },
        { "status": 1, "upc": 222, "externalId": "ext-2", "images": [] }
    ] },
    "2": { "id": 2, "topCategory": 20, "variants": [] }
}"#;

/// Shape of [`MANY_SNAPSHOT`].
#[must_use]
pub const fn many_shape() -> CatalogShape {
    CatalogShape {
        key_kind: KeyKind::Integer,
        variants: VariantShape::Many,
        upc: ScalarKind::Int,
    }
}

/// Engine over `json` with `shape`.
///
/// # Panics
///
/// Panics if the registry or the snapshot is invalid.
#[must_use]
pub fn engine_from(json: &str, shape: &CatalogShape) -> Engine {
    let registry = shape.registry().expect("valid registry");
    let store = snapshot::parse(json, shape).expect("valid snapshot");
    Engine::new(registry, store)
}

/// Engine over [`EXAMPLE_SNAPSHOT`] with the default shape.
#[must_use]
pub fn example_engine() -> Engine {
    engine_from(EXAMPLE_SNAPSHOT, &CatalogShape::default())
}

/// The full application router over `engine`, with default configuration.
///
/// # Panics
///
/// Panics if the default configuration is invalid.
#[must_use]
pub fn test_router(engine: Engine) -> Router {
    let config = ServerConfig::from_lookup(|_| None).expect("default config");
    router(AppState::new(config, engine))
}

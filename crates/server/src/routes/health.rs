//! Health check endpoints.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Readiness payload.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub products: usize,
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// The snapshot is loaded before the listener binds, so a running server is
/// always ready; the product count is reported for operators.
pub async fn readiness(State(state): State<AppState>) -> Json<Readiness> {
    Json(Readiness {
        status: "ok",
        products: state.engine().len(),
    })
}

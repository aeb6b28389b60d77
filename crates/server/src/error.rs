//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Every error is rendered as a GraphQL
//! envelope carrying only `errors`, so clients parse one response shape.
//! Server errors are captured to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::graphql::{BAD_REQUEST, GraphQLError, GraphQLResponse, RequestError};

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The GraphQL document could not be decoded.
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    /// The HTTP request itself is malformed (e.g. bad `variables` JSON).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = match &self {
            Self::Request(err) => (StatusCode::BAD_REQUEST, GraphQLResponse::from_error(err)),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                GraphQLResponse {
                    errors: vec![GraphQLError::with_code(message.clone(), BAD_REQUEST)],
                    ..GraphQLResponse::default()
                },
            ),
            // Don't expose internal error details to clients
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GraphQLResponse {
                    errors: vec![GraphQLError::with_code(
                        "Internal server error",
                        "INTERNAL_SERVER_ERROR",
                    )],
                    ..GraphQLResponse::default()
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

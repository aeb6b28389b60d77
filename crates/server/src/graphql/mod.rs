//! GraphQL transport.
//!
//! Decodes a GraphQL document into [`parse::Operation`]s against the single
//! `product(id:)` root field, runs them on the [`catalog_graph_core::Engine`]
//! and encodes the standard `{data, errors, extensions}` envelope.

pub mod execute;
pub mod parse;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use execute::execute;
pub use parse::{Operation, OperationKind, RootField};

/// `extensions.code` on errors reporting a rejected mutation field.
pub const FIELD_REJECTED: &str = "FIELD_REJECTED";

/// `extensions.code` on errors reporting a malformed request.
pub const BAD_REQUEST: &str = "BAD_REQUEST";

/// Errors that make a whole request unanswerable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Document contains no operation")]
    NoOperation,

    #[error("Unknown operation named \"{0}\"")]
    UnknownOperation(String),

    #[error("Must provide operation name if query contains multiple operations")]
    AmbiguousOperation,

    #[error("{0} operations are not supported")]
    UnsupportedOperation(&'static str),

    #[error("Fragments are not supported")]
    Fragment,

    #[error("Directive @{0} is not supported")]
    Directive(String),

    #[error("Cannot query field \"{0}\" on the root type")]
    UnknownRootField(String),

    #[error("Field \"{0}\" requires an id argument")]
    MissingId(String),

    #[error("Unknown argument \"{argument}\" on field \"{field}\"")]
    UnknownArgument { field: String, argument: String },

    #[error("Variable \"${0}\" is not defined")]
    UndefinedVariable(String),

    #[error("Fields \"{0}\" conflict because they have differing arguments")]
    ConflictingFields(String),
}

/// A GraphQL request body (`POST /graphql`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphQLRequest {
    /// A request with no variables and no operation name.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// One entry of the response `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphQLError {
    /// An error with only a message and a `code` extension.
    pub fn with_code(message: impl Into<String>, code: &str) -> Self {
        let mut extensions = serde_json::Map::new();
        extensions.insert("code".to_string(), code.into());
        Self {
            message: message.into(),
            path: Vec::new(),
            extensions: Some(extensions),
        }
    }
}

impl From<&RequestError> for GraphQLError {
    fn from(err: &RequestError) -> Self {
        Self::with_code(err.to_string(), BAD_REQUEST)
    }
}

/// The response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphQLResponse {
    /// Absent when the request could not be executed at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl GraphQLResponse {
    /// A response carrying only request-level errors.
    #[must_use]
    pub fn from_error(err: &RequestError) -> Self {
        Self {
            errors: vec![err.into()],
            ..Self::default()
        }
    }
}

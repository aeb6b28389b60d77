//! GraphQL endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::graphql::{GraphQLRequest, GraphQLResponse, execute};
use crate::state::AppState;

/// Query-string form of a GraphQL request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLParams {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    /// JSON-encoded variables object.
    #[serde(default)]
    pub variables: Option<String>,
}

impl TryFrom<GraphQLParams> for GraphQLRequest {
    type Error = AppError;

    fn try_from(params: GraphQLParams) -> std::result::Result<Self, Self::Error> {
        let variables = params
            .variables
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|e| AppError::BadRequest(format!("variables must be a JSON object: {e}")))?;
        Ok(Self {
            query: params.query,
            operation_name: params.operation_name,
            variables,
        })
    }
}

/// `GET /graphql?query=...`
pub async fn graphql_get(
    State(state): State<AppState>,
    Query(params): Query<GraphQLParams>,
) -> Result<Json<GraphQLResponse>> {
    run(state, params.try_into()?).await
}

/// `POST /graphql` with a JSON body.
pub async fn graphql_post(
    State(state): State<AppState>,
    Json(request): Json<GraphQLRequest>,
) -> Result<Json<GraphQLResponse>> {
    run(state, request).await
}

/// Execute off the async workers; entity locks block.
async fn run(state: AppState, request: GraphQLRequest) -> Result<Json<GraphQLResponse>> {
    let engine = state.engine().clone();
    let response = tokio::task::spawn_blocking(move || execute(&engine, &request))
        .await
        .map_err(|e| AppError::Internal(format!("GraphQL task failed: {e}")))??;
    Ok(Json(response))
}

//! Offline GraphQL execution.

use std::path::Path;

use catalog_graph_core::CatalogShape;
use catalog_graph_server::graphql::{GraphQLRequest, GraphQLResponse, execute};
use catalog_graph_server::load_engine;

/// Run `query` against the snapshot at `path` and print the JSON envelope.
///
/// Request errors are printed as an error envelope, like the server's 400
/// response, and reported as a failure.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, `variables` is not a
/// JSON object, or the document cannot be decoded.
#[allow(clippy::print_stdout)]
pub fn run(
    path: &Path,
    shape: &CatalogShape,
    query: String,
    variables: Option<&str>,
    operation_name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = load_engine(path, shape)?;
    let variables = variables
        .map(serde_json::from_str::<serde_json::Map<String, serde_json::Value>>)
        .transpose()
        .map_err(|e| format!("--variables must be a JSON object: {e}"))?;
    let request = GraphQLRequest {
        query,
        operation_name,
        variables,
    };

    match execute(&engine, &request) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&GraphQLResponse::from_error(&err))?
            );
            Err(err.into())
        }
    }
}

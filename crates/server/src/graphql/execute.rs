//! Running decoded operations on the engine.

use catalog_graph_core::{AppliedField, Engine, RejectedField};
use serde::Serialize;
use serde_json::Value as Json;

use super::parse::{Operation, OperationKind, RootField, parse};
use super::{FIELD_REJECTED, GraphQLError, GraphQLRequest, GraphQLResponse, RequestError};

/// Per-field mutation report, published under `extensions.mutations`.
#[derive(Debug, Serialize)]
struct MutationReport<'a> {
    applied: &'a [AppliedField],
    rejected: &'a [RejectedField],
}

/// Decode and run a request.
///
/// # Errors
///
/// Returns [`RequestError`] if the request cannot be decoded. Unknown
/// products and rejected fields are reported inside the response instead.
pub fn execute(engine: &Engine, request: &GraphQLRequest) -> Result<GraphQLResponse, RequestError> {
    let no_variables = serde_json::Map::new();
    let variables = request.variables.as_ref().unwrap_or(&no_variables);
    let operation = parse(&request.query, request.operation_name.as_deref(), variables)?;
    Ok(run(engine, &operation))
}

/// Run every root field of `operation` in order.
#[must_use]
pub fn run(engine: &Engine, operation: &Operation) -> GraphQLResponse {
    let mut response = GraphQLResponse::default();
    let mut data = serde_json::Map::new();
    let mut mutations = serde_json::Map::new();

    for field in &operation.fields {
        let key = field.response_key().to_owned();
        let value = match operation.kind {
            OperationKind::Query => query_field(engine, field),
            OperationKind::Mutation => {
                mutate_field(engine, field, &mut response.errors, &mut mutations)
            }
        };
        data.insert(key, value);
    }

    response.data = Some(data);
    if !mutations.is_empty() {
        response
            .extensions
            .insert("mutations".to_string(), Json::Object(mutations));
    }
    response
}

fn query_field(engine: &Engine, field: &RootField) -> Json {
    match engine.query(&field.id, &field.selection) {
        Ok(output) => Json::Object(output),
        Err(err) => {
            tracing::debug!(error = %err, "Query resolved to null");
            Json::Null
        }
    }
}

fn mutate_field(
    engine: &Engine,
    field: &RootField,
    errors: &mut Vec<GraphQLError>,
    mutations: &mut serde_json::Map<String, Json>,
) -> Json {
    let outcome = match engine.mutate(&field.id, &field.input) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(error = %err, "Mutation resolved to null");
            return Json::Null;
        }
    };

    let key = field.response_key();
    errors.extend(
        outcome
            .rejected
            .iter()
            .map(|rejected| rejected_error(key, rejected)),
    );
    let report = MutationReport {
        applied: &outcome.applied,
        rejected: &outcome.rejected,
    };
    mutations.insert(
        key.to_owned(),
        serde_json::to_value(report).unwrap_or_default(),
    );
    Json::Object(engine.resolve(&outcome.product, &field.selection))
}

fn rejected_error(key: &str, rejected: &RejectedField) -> GraphQLError {
    let mut error = GraphQLError::with_code(
        format!("Field {} rejected: {}", rejected.path, rejected.reason),
        FIELD_REJECTED,
    );
    error.path = vec![Json::String(key.to_owned())];
    if let Some(extensions) = error.extensions.as_mut() {
        extensions.insert("field".to_string(), rejected.path.to_string().into());
        if let Some(expected) = &rejected.expected {
            extensions.insert("expected".to_string(), expected.to_string().into());
        }
    }
    error
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_graph_core::CatalogShape;
    use serde_json::json;

    use super::*;
    use crate::snapshot;

    fn engine() -> Engine {
        let shape = CatalogShape::default();
        let store = snapshot::parse(
            r#"{ "42": { "id": 42, "topCategory": 1,
                 "variant": { "status": 0, "upc": "A1", "images": ["u1"] } } }"#,
            &shape,
        )
        .unwrap();
        Engine::new(shape.registry().unwrap(), store)
    }

    fn to_json(response: &GraphQLResponse) -> Json {
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_query_envelope() {
        let engine = engine();
        let response = execute(
            &engine,
            &GraphQLRequest::new(
                r#"{ product(id: "42") { id variant { upc images } } missing: product(id: "9") { id } }"#,
            ),
        )
        .unwrap();
        assert_eq!(
            to_json(&response),
            json!({
                "data": {
                    "product": { "id": "42", "variant": { "upc": "A1", "images": ["u1"] } },
                    "missing": null
                }
            })
        );
    }

    #[test]
    fn test_mutation_reports_applied_and_rejected() {
        let engine = engine();
        let response = execute(
            &engine,
            &GraphQLRequest::new(
                r#"mutation { product(id: "42", topCategory: 9, variant: { status: "bad" }) {
                    topCategory variant { status }
                } }"#,
            ),
        )
        .unwrap();
        assert_eq!(
            to_json(&response),
            json!({
                "data": { "product": { "topCategory": 9, "variant": { "status": 0 } } },
                "errors": [{
                    "message": "Field variant.status rejected: expected Int, got String",
                    "path": ["product"],
                    "extensions": {
                        "code": "FIELD_REJECTED",
                        "field": "variant.status",
                        "expected": "Int"
                    }
                }],
                "extensions": { "mutations": { "product": {
                    "applied": [{ "path": "topCategory", "value": 9 }],
                    "rejected": [{
                        "path": "variant.status",
                        "expected": "Int",
                        "reason": "expected Int, got String"
                    }]
                } } }
            })
        );
    }

    #[test]
    fn test_mutation_on_missing_product() {
        let engine = engine();
        let response = execute(
            &engine,
            &GraphQLRequest::new(r#"mutation { product(id: "nope", topCategory: 2) { id } }"#),
        )
        .unwrap();
        assert_eq!(to_json(&response), json!({ "data": { "product": null } }));
    }

    #[test]
    fn test_conflicting_mutations_run_nothing() {
        let engine = engine();
        let err = execute(
            &engine,
            &GraphQLRequest::new(
                r#"mutation {
                    product(id: "42", topCategory: 7) { id }
                    product(id: "42", variant: { status: "bad" }) { id }
                }"#,
            ),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::ConflictingFields("product".to_string()));

        let response = execute(
            &engine,
            &GraphQLRequest::new(r#"{ product(id: "42") { topCategory } }"#),
        )
        .unwrap();
        assert_eq!(
            to_json(&response),
            json!({ "data": { "product": { "topCategory": 1 } } })
        );
    }

    #[test]
    fn test_request_error() {
        let engine = engine();
        let err = execute(&engine, &GraphQLRequest::new("{ catalog { id } }")).unwrap_err();
        assert_eq!(err, RequestError::UnknownRootField("catalog".to_string()));
    }
}

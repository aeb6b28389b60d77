//! The axum router driven in-process.
#![allow(clippy::unwrap_used)]

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use catalog_graph_integration_tests::{example_engine, test_router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = test_router(example_engine()).oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, request_id)
}

fn post_graphql(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let (status, _, request_id) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(request_id.is_some());

    let (status, body, _) = send(get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "products": 3 }));
}

#[tokio::test]
async fn test_get_query() {
    let (status, body, _) = send(get(
        "/graphql?query=%7Bproduct(id%3A%2242%22)%7Bid%20topCategory%7D%7D",
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": { "product": { "id": "42", "topCategory": 1 } } })
    );
}

#[tokio::test]
async fn test_post_query_with_variables_and_aliases() {
    let (status, body, _) = send(post_graphql(&json!({
        "query": "query Two($a: ID!, $b: ID!) { first: product(id: $a) { variant { upc } } second: product(id: $b) { variant { upc } } }",
        "variables": { "a": "42", "b": "44" }
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": {
            "first": { "variant": { "upc": "A1" } },
            "second": { "variant": null }
        } })
    );
}

#[tokio::test]
async fn test_post_mutation_partial_success() {
    let (status, body, _) = send(post_graphql(&json!({
        "query": "mutation { product(id: \"42\", topCategory: 9, variant: { status: \"bad\" }) { topCategory variant { status } } }"
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "product": { "topCategory": 9, "variant": { "status": 0 } } })
    );
    assert_eq!(body["errors"][0]["extensions"]["code"], "FIELD_REJECTED");
    assert_eq!(body["errors"][0]["extensions"]["field"], "variant.status");
    assert_eq!(
        body["extensions"]["mutations"]["product"]["applied"],
        json!([{ "path": "topCategory", "value": 9 }])
    );
}

#[tokio::test]
async fn test_unknown_product_is_null() {
    let (status, body, _) = send(post_graphql(&json!({
        "query": "{ product(id: \"unknown-id\") { id } }"
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "product": null } }));
}

#[tokio::test]
async fn test_request_errors_are_bad_requests() {
    let (status, body, _) = send(post_graphql(&json!({ "query": "{ product(id: " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("data").is_none());
    assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_REQUEST");

    let (status, body, _) = send(get("/graphql?query=%7Bproduct(id%3A%2242%22)%7Bid%7D%7D&variables=nope")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["errors"][0]["message"]
            .as_str()
            .unwrap()
            .starts_with("variables must be a JSON object")
    );
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let (_, _, request_id) = send(request).await;
    assert_eq!(request_id.as_deref(), Some("req-123"));
}

#[tokio::test]
async fn test_empty_request_id_is_replaced() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "")
        .body(Body::empty())
        .unwrap();
    let (_, _, request_id) = send(request).await;
    let request_id = request_id.unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn test_mutations_persist_across_requests() {
    let router = test_router(example_engine());
    let mutation = post_graphql(&json!({
        "query": "mutation Set($cat: Int) { product(id: \"43\", topCategory: $cat) { id } }",
        "variables": { "cat": 12 }
    }));
    let response = router.clone().oneshot(mutation).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let query = post_graphql(&json!({ "query": "{ product(id: \"43\") { topCategory } }" }));
    let response = router.oneshot(query).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "data": { "product": { "topCategory": 12 } } }));
}

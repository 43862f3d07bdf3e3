//! HTTP API tests against the router, without binding a socket

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use embedding_db::server::{routes::create_router, AppState};
use embedding_db::VectorStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let store = VectorStore::new(2).unwrap();
    create_router(Arc::new(AppState::new(store)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seeded_app() -> Router {
    let app = app();
    for (label, vector) in [("x", [1.0, 0.0]), ("y", [0.0, 1.0]), ("z", [1.0, 1.0])] {
        let (status, _) = send(
            &app,
            "POST",
            "/vectors",
            Some(json!({"label": label, "vector": vector})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

#[tokio::test]
async fn test_insert_and_list() {
    let app = seeded_app().await;

    let (status, body) = send(&app, "GET", "/vectors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["x", "y", "z"]));
}

#[tokio::test]
async fn test_insert_wrong_dimension() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/vectors",
        Some(json!({"label": "bad", "vector": [1.0, 2.0, 3.0]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dimension mismatch: expected 2, got 3");
}

#[tokio::test]
async fn test_get_vector() {
    let app = seeded_app().await;

    let (status, body) = send(&app, "GET", "/vectors/z", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"label": "z", "vector": [1.0, 1.0]}));

    let (status, _) = send(&app, "GET", "/vectors/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_by_vector() {
    let app = seeded_app().await;

    let (status, body) = send(&app, "POST", "/search", Some(json!({"vector": [1.0, 0.0], "k": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["x", "z"]);
}

#[tokio::test]
async fn test_search_by_label_excluding_self() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/search",
        Some(json!({"label": "x", "k": 5, "exclude_self": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["z", "y"]);
}

#[tokio::test]
async fn test_search_errors() {
    let app = seeded_app().await;

    let (status, _) = send(&app, "POST", "/search", Some(json!({"k": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/search",
        Some(json!({"label": "x", "vector": [1.0, 0.0]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/search", Some(json!({"label": "nope"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/search", Some(json!({"vector": [0.0, 0.0]}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "POST", "/search", Some(json!({"vector": [1.0]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insert_zero_vector_is_unprocessable() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/vectors",
        Some(json!({"label": "origin", "vector": [0.0, 0.0]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/vectors/origin", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", "/search", Some(json!({"vector": [1.0, 0.0], "k": 3}))).await;
    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["x", "z", "y"]);

    let (_, body) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(body["total_inserts"], 3);
    assert_eq!(body["total_rejected"], 1);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = seeded_app().await;

    send(&app, "POST", "/search", Some(json!({"vector": [1.0, 0.0]}))).await;
    send(&app, "POST", "/search", Some(json!({"label": "nope"}))).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vector_count"], 3);
    assert_eq!(body["dimension"], 2);

    let (status, body) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_inserts"], 3);
    assert_eq!(body["total_queries"], 1);
    assert_eq!(body["total_rejected"], 1);
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::support::{prompt_file, test_app};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use futures::StreamExt;
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_reports_status_and_cache_stats() {
    let prompt = prompt_file();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = test_app(prompt.path()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "webtool-mcp");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["protocol"], "2024-11-05");
    assert!(body["features"].as_array().unwrap().contains(&Value::from("link-follow")));
    assert_eq!(body["page"]["html_cache"]["capacity"], 8);
    assert_eq!(body["page"]["fetch_rate_per_min"], 60);
}

#[tokio::test]
async fn test_sse_stream_sends_ready_event() {
    let prompt = prompt_file();
    let request = Request::builder().uri("/mcp").body(Body::empty()).unwrap();

    let response = test_app(prompt.path()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(response.headers()["x-accel-buffering"], "no");

    let mut stream = response.into_body().into_data_stream();
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(&first[..], b"event: ready\ndata: {}\n\n");
}

#[tokio::test]
async fn test_unknown_route_is_json_rpc_error() {
    let prompt = prompt_file();
    let request = Request::builder().uri("/tools").body(Body::empty()).unwrap();

    let response = test_app(prompt.path()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "No route for /tools");
}

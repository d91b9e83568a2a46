// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::support::{post_mcp, prompt_file, test_app};
use axum::http::StatusCode;
use serde_json::{json, Value};

fn assert_invalid_request(response: &Value) {
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["error"]["code"], -32600);
    assert_eq!(response["error"]["message"], "Invalid Request");
    assert!(response["error"]["data"]["hint"]
        .as_str()
        .unwrap()
        .contains("include 'function'/'name'"));
}

#[tokio::test]
async fn test_empty_body_gets_hint() {
    let prompt = prompt_file();
    let (status, response) = post_mcp(test_app(prompt.path()), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_invalid_request(&response);
}

#[tokio::test]
async fn test_malformed_json_gets_hint() {
    let prompt = prompt_file();
    let (status, response) = post_mcp(test_app(prompt.path()), "{\"jsonrpc\": ").await;
    assert_eq!(status, StatusCode::OK);
    assert_invalid_request(&response);
}

#[tokio::test]
async fn test_payload_without_function_gets_hint() {
    let prompt = prompt_file();
    let (_, response) = post_mcp(test_app(prompt.path()), r#"{"url": "https://example.com"}"#).await;
    assert_invalid_request(&response);
}

#[tokio::test]
async fn test_info_names_return_catalogue() {
    let prompt = prompt_file();
    for name in ["initialize", "list_tools", "health", "info"] {
        let body = json!({ "function": name });
        let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

        let info = &response["response"];
        assert_eq!(info["status"], "ok", "{}", name);
        assert!(info["functions"]["fetch_url"]["args"]["url"].is_string());
        assert_eq!(
            info["system_prompt_head"],
            json!([
                "You are a browsing assistant.",
                "Prefer outline mode first.",
                "Cite sources."
            ])
        );
    }
}

#[tokio::test]
async fn test_unknown_function_warns() {
    let prompt = prompt_file();
    let body = json!({"name": "teleport", "arguments": {"to": "mars"}});

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(response["warning"], "Unknown function 'teleport'");
    assert_eq!(response["response"]["status"], "ok");
}

#[tokio::test]
async fn test_legacy_system_prompt() {
    let prompt = prompt_file();
    let body = json!({"function": "get_system_prompt"});

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(response["response"]["version"], "1.1");
    assert!(response["response"]["prompt"]
        .as_str()
        .unwrap()
        .starts_with("You are a browsing assistant."));
}

#[tokio::test]
async fn test_legacy_fetch_reads_top_level_fields() {
    let prompt = prompt_file();
    // With empty args the payload itself carries the url
    let body = json!({"function": "fetch_url", "args": {}, "url": "ftp://example.com/x"});

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert!(response["response"]["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not fetch ftp://example.com/x"));
}

#[tokio::test]
async fn test_missing_prompt_file_uses_fallback_head() {
    let (_, response) = post_mcp(
        test_app(std::path::Path::new("/nonexistent/sysprompt.md")),
        r#"{"function": "info"}"#,
    )
    .await;

    let head = response["response"]["system_prompt_head"].as_array().unwrap();
    assert_eq!(head.len(), 1);
    assert!(head[0].as_str().unwrap().contains("fallback minimal prompt"));
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::support::{post_mcp, prompt_file, test_app, tool_text};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_initialize_handshake() {
    let prompt = prompt_file();
    let body = json!({"jsonrpc": "2.0", "id": "init-1", "method": "initialize", "params": {}});

    let (status, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], "init-1");
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "webtool-mcp");
    assert_eq!(response["result"]["serverInfo"]["version"], "1.0.0");
    assert!(response.get("error").is_none());
}

#[tokio::test]
async fn test_tools_list_both_spellings() {
    let prompt = prompt_file();
    for method in ["tools/list", "tools.list"] {
        let body = json!({"jsonrpc": "2.0", "id": 2, "method": method});
        let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8, "{}", method);
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert!(names.contains(&"fetch_url"));
        assert!(names.contains(&"get_system_prompt"));
    }
}

#[tokio::test]
async fn test_unknown_method() {
    let prompt = prompt_file();
    let body = json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"});

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(response["id"], 3);
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Unknown method 'resources/list'");
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_unknown_tool() {
    let prompt = prompt_file();
    let body = json!({
        "jsonrpc": "2.0", "id": 4, "method": "tools/call",
        "params": {"name": "ai_company_news", "arguments": {}}
    });

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Unknown tool 'ai_company_news'");
}

#[tokio::test]
async fn test_get_system_prompt_tool() {
    let prompt = prompt_file();
    let body = json!({
        "jsonrpc": "2.0", "id": 5, "method": "tools.call",
        "params": {"toolName": "get_system_prompt"}
    });

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(response["result"]["content"][0]["type"], "text");
    assert_eq!(
        tool_text(&response),
        "You are a browsing assistant.\nPrefer outline mode first.\nCite sources."
    );
}

#[tokio::test]
async fn test_fetch_url_errors_are_tool_text() {
    let prompt = prompt_file();
    let body = json!({
        "jsonrpc": "2.0", "id": 6, "method": "tools/call",
        "params": {"function": "fetch_url", "args": {"url": "ftp://example.com/a", "mode": "outline"}}
    });

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert!(response.get("error").is_none());
    assert!(tool_text(&response).starts_with("Error fetching URL: Could not fetch ftp://example.com/a"));
}

#[tokio::test]
async fn test_json_results_are_serialized_to_text() {
    let prompt = prompt_file();
    let body = json!({
        "jsonrpc": "2.0", "id": 7, "method": "tools/call",
        "params": {"name": "stock_quotes", "arguments": {"symbols": " , "}}
    });

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    let parsed: Value = serde_json::from_str(&tool_text(&response)).unwrap();
    assert_eq!(parsed, json!({"error": "No symbols provided"}));
}

#[tokio::test]
async fn test_search_tool_with_empty_query() {
    let prompt = prompt_file();
    let body = json!({
        "jsonrpc": "2.0", "id": 8, "method": "tools/call",
        "params": {"name": "web_search", "arguments": {"query": "", "engine": "multi"}}
    });

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;
    assert_eq!(tool_text(&response), r#"{"error":"Empty query"}"#);
}

#[tokio::test]
async fn test_unreachable_news_source_returns_json_error_text() {
    let prompt = prompt_file();
    let body = json!({
        "jsonrpc": "2.0", "id": 9, "method": "tools/call",
        "params": {"name": "latvian_news", "arguments": {"query": "sports"}}
    });

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    let parsed: Value = serde_json::from_str(&tool_text(&response)).unwrap();
    assert!(parsed["error"].as_str().unwrap().starts_with("News fetch failed: "));
}

#[tokio::test]
async fn test_request_without_id_answers_null_id() {
    let prompt = prompt_file();
    let body = json!({"jsonrpc": "2.0", "method": "initialize"});

    let (_, response) = post_mcp(test_app(prompt.path()), body.to_string()).await;

    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["result"]["capabilities"], json!({"tools": {}}));
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Router construction and request helpers for offline API tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tower::ServiceExt;
use webtool_mcp::api::{create_app, AppState};
use webtool_mcp::mcp::{SystemPrompt, ToolDispatcher};
use webtool_mcp::page::{FetchRateLimiter, PageCache, PageFetcher, PageService};
use webtool_mcp::search::bing::BingSearchProvider;
use webtool_mcp::search::duckduckgo::DuckDuckGoProvider;
use webtool_mcp::search::google_cse::GoogleCseProvider;
use webtool_mcp::search::{SearchConfig, SearchService};
use webtool_mcp::sources::{NewsClient, StockClient, WikipediaClient};

// Nothing listens on the discard port
const DEAD: &str = "http://127.0.0.1:9/";

pub const PROMPT_FILE: &str = "# Agent guide\n\n```\nYou are a browsing assistant.\nPrefer outline mode first.\nCite sources.\n```\n";

pub fn prompt_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PROMPT_FILE.as_bytes()).unwrap();
    file
}

pub fn test_app(prompt_path: &Path) -> Router {
    let pages = PageService::with_parts(
        PageFetcher::new(Duration::from_secs(2)).unwrap(),
        PageCache::new(8, Duration::from_secs(60)),
        PageCache::new(8, Duration::from_secs(60)),
        FetchRateLimiter::new(60),
    );
    let search = SearchService::with_providers(
        DuckDuckGoProvider::with_endpoints(500, DEAD, DEAD, DEAD),
        BingSearchProvider::with_endpoint(500, DEAD),
        GoogleCseProvider::new(None, None, 500),
        SearchConfig::default(),
    );
    let dispatcher = ToolDispatcher::with_sources(
        Arc::new(pages),
        Arc::new(search),
        WikipediaClient::with_endpoint(DEAD),
        NewsClient::with_endpoints(DEAD, DEAD),
        StockClient::with_endpoint(DEAD),
        SystemPrompt::new(prompt_path),
    );
    create_app(AppState::new(dispatcher))
}

pub async fn post_mcp(app: Router, body: impl Into<String>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Text of the single content block in a tools/call result
pub fn tool_text(response: &Value) -> String {
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

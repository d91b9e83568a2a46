// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::fixture::{page_service, spawn_fixture};
use webtool_mcp::page::FetchUrlRequest;

#[tokio::test]
async fn test_http_status_error_text() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let url = server.url("/nowhere");

    let text = service.fetch_url_tool(&FetchUrlRequest::new(url.as_str())).await;
    assert_eq!(
        text,
        format!("Error fetching URL: Could not fetch {}: HTTP 404", url)
    );
}

#[tokio::test]
async fn test_unsupported_scheme() {
    let service = page_service(60);
    let text = service
        .fetch_url_tool(&FetchUrlRequest::new("ftp://example.com/file"))
        .await;
    assert!(text.starts_with("Error fetching URL: Could not fetch ftp://example.com/file: invalid URL"));
}

#[tokio::test]
async fn test_missing_url() {
    let service = page_service(60);
    let text = service.fetch_url_tool(&FetchUrlRequest::new("")).await;
    assert!(text.starts_with("Error fetching URL: Could not fetch"));
}

#[tokio::test]
async fn test_failed_fetches_are_not_cached() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let request = FetchUrlRequest::new(server.url("/nowhere"));

    service.fetch_url_tool(&request).await;
    service.fetch_url_tool(&request).await;

    assert_eq!(server.hits(), 2);
    assert_eq!(service.stats().html_cache.entries, 0);
}

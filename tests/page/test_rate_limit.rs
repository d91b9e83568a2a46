// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::fixture::{page_service, spawn_fixture};
use webtool_mcp::page::FetchUrlRequest;

#[tokio::test]
async fn test_rate_limit_rejects_new_urls() {
    let server = spawn_fixture().await;
    let service = page_service(1);

    let first = service
        .fetch_url_tool(&FetchUrlRequest::new(server.url("/guide")))
        .await;
    assert!(first.starts_with("META\n"));

    let second = service
        .fetch_url_tool(&FetchUrlRequest::new(server.url("/other")))
        .await;
    assert_eq!(
        second,
        "Error fetching URL: Rate limit exceeded: max 1 fetch_url network requests per minute. Try later or rely on cached outline/chunks."
    );
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_cached_pages_bypass_rate_limit() {
    let server = spawn_fixture().await;
    let service = page_service(1);
    let request = FetchUrlRequest::new(server.url("/guide"));

    service.fetch_url_tool(&request).await;
    let cached = service.fetch_url_tool(&request).await;

    assert!(cached.starts_with("META\ncache_status: html_hit\n"));
    assert_eq!(service.stats().fetches_in_window, 1);
}

#[tokio::test]
async fn test_zero_limit_is_unlimited() {
    let server = spawn_fixture().await;
    let service = page_service(0);

    for path in ["/guide", "/other", "/target"] {
        let text = service.fetch_url_tool(&FetchUrlRequest::new(server.url(path))).await;
        assert!(text.starts_with("META\n"), "{} was rejected: {}", path, text);
    }
    assert_eq!(server.hits(), 3);
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::fixture::{page_service, spawn_fixture};
use webtool_mcp::page::{FetchUrlRequest, RenderMode};

#[tokio::test]
async fn test_first_fetch_has_no_cache_status() {
    let server = spawn_fixture().await;
    let service = page_service(60);

    let text = service
        .fetch_url_tool(&FetchUrlRequest::new(server.url("/guide")))
        .await;

    assert!(text.starts_with(&format!("META\nsource: {}\n", server.url("/guide"))));
    assert!(!text.contains("cache_status"));
    assert!(text.contains("title: Fixture Guide"));
    assert!(text.contains("description: A tiny guide"));
    assert!(text.contains("KEYPOINTS"));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_repeat_full_fetch_reports_html_hit() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let request = FetchUrlRequest::new(server.url("/guide"));

    service.fetch_url_tool(&request).await;
    let second = service.fetch_url_tool(&request).await;

    assert!(second.starts_with("META\ncache_status: html_hit\nsource: "));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_outline_cache_hit() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let request = FetchUrlRequest::new(server.url("/guide")).with_mode(RenderMode::Outline);

    let first = service.fetch_url_tool(&request).await;
    assert!(first.contains("OUTLINE\nsec-1 Overview\n  sec-2 Details\n  sec-3 Elsewhere"));
    assert!(!first.contains("cache_status"));

    let second = service.fetch_url_tool(&request).await;
    assert!(second.starts_with("META\ncache_status: html_hit,outline_hit\n"));
    // The cached outline carries the first fetch time
    assert_eq!(second.replacen("cache_status: html_hit,outline_hit\n", "", 1), first);

    let stats = service.stats();
    assert_eq!(stats.outline_cache.entries, 1);
    assert_eq!(stats.html_cache.hits, 1);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_outline_with_chunk_skips_outline_cache() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let url = server.url("/guide");

    let request = FetchUrlRequest::new(url.as_str())
        .with_mode(RenderMode::Outline)
        .with_chunk("sec-2");
    service.fetch_url_tool(&request).await;
    let again = service.fetch_url_tool(&request).await;

    assert!(again.contains("cache_status: html_hit\n"));
    assert!(!again.contains("outline_hit"));
    assert_eq!(service.stats().outline_cache.entries, 0);
}

#[tokio::test]
async fn test_chunk_focus_and_unknown_chunk() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let url = server.url("/guide");

    let focus = service
        .fetch_url_tool(&FetchUrlRequest::new(url.as_str()).with_chunk("sec-2"))
        .await;
    assert!(focus.contains("CHUNK\nid: sec-2\nheading: Details\nlevel: 2"));
    assert!(focus.contains("NEIGHBORS\nprevious: sec-1\nnext: sec-3"));
    assert!(focus.contains(&format!("[L1] Target page — {}", server.url("/target"))));

    let fallback = service
        .fetch_url_tool(&FetchUrlRequest::new(url.as_str()).with_chunk("sec-99"))
        .await;
    assert!(!fallback.contains("\nCHUNK\n"));
    assert!(fallback.contains("KEYPOINTS"));
}

#[tokio::test]
async fn test_empty_body_renders_empty_status_and_is_not_cached() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let url = server.url("/empty");

    let text = service.fetch_url_tool(&FetchUrlRequest::new(url.as_str())).await;
    assert_eq!(text, format!("META\nsource: {}\nstatus: empty", url));

    service.fetch_url_tool(&FetchUrlRequest::new(url.as_str())).await;
    assert_eq!(server.hits(), 2);
    assert_eq!(service.stats().html_cache.entries, 0);
}

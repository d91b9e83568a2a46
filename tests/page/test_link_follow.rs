// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::fixture::{page_service, spawn_fixture};
use webtool_mcp::page::{FetchUrlRequest, RenderMode};

#[tokio::test]
async fn test_follow_renders_history_and_target() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let base = server.url("/guide");

    let text = service
        .fetch_url_tool(&FetchUrlRequest::new(base.as_str()).with_link("L1"))
        .await;

    let expected_history = format!(
        "HISTORY\nfrom_page: {}\nfollowed: L1 -> {}\nlink_text: Target page\n\nMETA\nsource: {}\n",
        base,
        server.url("/target"),
        server.url("/target")
    );
    assert!(text.starts_with(&expected_history), "got: {}", text);
    assert!(text.contains("title: Target Title"));
    assert!(text.contains("sec-1 lvl=1"));
    // base page plus the followed target
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_follow_accepts_bare_number_and_mode() {
    let server = spawn_fixture().await;
    let service = page_service(60);

    let text = service
        .fetch_url_tool(
            &FetchUrlRequest::new(server.url("/guide"))
                .with_link("1")
                .with_mode(RenderMode::Outline),
        )
        .await;

    assert!(text.contains("followed: 1 -> "));
    assert!(text.contains("OUTLINE\nsec-1 Arrived"));
    assert!(!text.contains("KEYPOINTS"));
}

#[tokio::test]
async fn test_follow_out_of_range() {
    let server = spawn_fixture().await;
    let service = page_service(60);

    let text = service
        .fetch_url_tool(&FetchUrlRequest::new(server.url("/guide")).with_link("L999"))
        .await;

    assert!(text.starts_with("Link follow error: link_id L999 out of range (1..2)\nBase page snippet: "));
    assert!(text.ends_with("You can retry with a different link_id or fetch without link_id."));
}

#[tokio::test]
async fn test_follow_invalid_format() {
    let server = spawn_fixture().await;
    let service = page_service(60);

    let text = service
        .fetch_url_tool(&FetchUrlRequest::new(server.url("/guide")).with_link("next"))
        .await;

    assert!(text.starts_with("Link follow error: Invalid link_id format: next"));
}

#[tokio::test]
async fn test_follow_broken_target() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let missing = server.url("/missing");

    let text = service
        .fetch_url_tool(&FetchUrlRequest::new(server.url("/guide")).with_link("L2"))
        .await;

    assert_eq!(
        text,
        format!(
            "Error following L2 → {}: Could not fetch {}: HTTP 404",
            missing, missing
        )
    );
}

#[tokio::test]
async fn test_follow_on_cached_base_annotates_target_meta() {
    let server = spawn_fixture().await;
    let service = page_service(60);
    let base = server.url("/guide");

    service.fetch_url_tool(&FetchUrlRequest::new(base.as_str())).await;
    let text = service
        .fetch_url_tool(&FetchUrlRequest::new(base.as_str()).with_link("L1"))
        .await;

    assert!(text.starts_with("HISTORY\n"));
    assert!(text.contains("\n\nMETA\ncache_status: html_hit\nsource: "));
}

#[tokio::test]
async fn test_chunk_id_disables_follow() {
    let server = spawn_fixture().await;
    let service = page_service(60);

    let text = service
        .fetch_url_tool(
            &FetchUrlRequest::new(server.url("/guide"))
                .with_link("L1")
                .with_chunk("sec-1"),
        )
        .await;

    assert!(!text.contains("HISTORY"));
    assert!(text.contains("CHUNK\nid: sec-1"));
    assert_eq!(server.hits(), 1);
}

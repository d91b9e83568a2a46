// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::fixture::spawn_search_fixture;

#[tokio::test]
async fn test_lite_tier_wins() {
    let fixture = spawn_search_fixture().await;
    let service = fixture.service(fixture.duckduckgo("/lite", "/html", "/instant"), fixture.bing("/bing"));

    let value = service.search_duckduckgo("rust", 5).await;

    assert_eq!(value["engine"], "duckduckgo");
    assert_eq!(value["source"], "duckduckgo lite");
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "Rust Programming Language");
    assert_eq!(results[0]["snippet"], "A language empowering everyone.");
    assert_eq!(results[1]["url"], "https://doc.rust-lang.org/book/");
}

#[tokio::test]
async fn test_lite_respects_max_results() {
    let fixture = spawn_search_fixture().await;
    let service = fixture.service(fixture.duckduckgo("/lite", "/html", "/instant"), fixture.bing("/bing"));

    let value = service.search_duckduckgo("rust", 1).await;
    assert_eq!(value["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_html_tier_after_empty_lite() {
    let fixture = spawn_search_fixture().await;
    let service =
        fixture.service(fixture.duckduckgo("/lite-empty", "/html", "/instant"), fixture.bing("/bing"));

    let value = service.search_duckduckgo("crates", 5).await;

    assert_eq!(value["engine"], "duckduckgo_html");
    assert_eq!(value["source"], "duckduckgo html scrape");
    assert_eq!(value["results"][0]["url"], "https://crates.io/");
    assert_eq!(value["results"][0]["snippet"], "The Rust community's crate registry.");
}

#[tokio::test]
async fn test_instant_tier_after_failures() {
    let fixture = spawn_search_fixture().await;
    let service =
        fixture.service(fixture.duckduckgo("/broken", "/html-empty", "/instant"), fixture.bing("/bing"));

    let value = service.search_duckduckgo("rust", 5).await;

    assert_eq!(value["engine"], "duckduckgo_instant");
    assert_eq!(value["heading"], "Rust");
    assert_eq!(value["abstract"], "Rust is a systems programming language.");
    assert_eq!(value["related"].as_array().unwrap().len(), 1);
    assert!(value.get("note").is_none());
}

#[tokio::test]
async fn test_sparse_instant_answer_gets_note() {
    let fixture = spawn_search_fixture().await;
    let service = fixture.service(
        fixture.duckduckgo("/lite-empty", "/html-empty", "/instant-sparse"),
        fixture.bing("/bing"),
    );

    let value = service.search_duckduckgo("zzzz", 5).await;

    assert_eq!(value["engine"], "duckduckgo_instant");
    assert!(value["note"].as_str().unwrap().contains("web_search"));
}

#[tokio::test]
async fn test_all_tiers_failing() {
    let fixture = spawn_search_fixture().await;
    let service =
        fixture.service(fixture.duckduckgo("/broken", "/broken", "/broken"), fixture.bing("/bing"));

    let value = service.search_duckduckgo("rust", 5).await;
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("DuckDuckGo request failed: "));
}

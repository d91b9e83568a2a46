// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Canned search engine pages served from 127.0.0.1

use axum::{
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use webtool_mcp::search::bing::BingSearchProvider;
use webtool_mcp::search::duckduckgo::DuckDuckGoProvider;
use webtool_mcp::search::google_cse::GoogleCseProvider;
use webtool_mcp::search::{SearchConfig, SearchService};

const LITE_PAGE: &str = r#"<html><body><table>
<tr><td>1.</td><td><a rel="nofollow" class="result-link" href="https://www.rust-lang.org/">Rust Programming Language</a></td></tr>
<tr><td></td><td class="result-snippet">A language empowering everyone.</td></tr>
<tr><td>2.</td><td><a rel="nofollow" class="result-link" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F&amp;rut=1">The Rust Book</a></td></tr>
<tr><td></td><td class="result-snippet">Learn Rust from the ground up.</td></tr>
</table></body></html>"#;

const HTML_PAGE: &str = r#"<html><body>
<div class="result"><div class="links_main result__body">
  <h2 class="result__title"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fcrates.io%2F&amp;rut=2">crates.io</a></h2>
  <a class="result__snippet" href="x">The Rust community's crate registry.</a>
</div></div>
</body></html>"#;

const BING_PAGE: &str = r#"<html><body><ol id="b_results">
<li class="b_algo"><h2><a href="https://tokio.rs/">Tokio - An asynchronous Rust runtime</a></h2>
  <div class="b_caption"><p>Build reliable network applications.</p></div></li>
<li class="b_algo"><h2><a href="https://docs.rs/">Docs.rs</a></h2></li>
<li class="b_algo"><h2>No link here</h2></li>
</ol></body></html>"#;

pub struct SearchFixture {
    pub base: String,
}

impl SearchFixture {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn duckduckgo(&self, lite: &str, html: &str, instant: &str) -> DuckDuckGoProvider {
        DuckDuckGoProvider::with_endpoints(2000, &self.url(lite), &self.url(html), &self.url(instant))
    }

    pub fn bing(&self, path: &str) -> BingSearchProvider {
        BingSearchProvider::with_endpoint(2000, &self.url(path))
    }

    /// Service whose engines all point at fixture routes
    pub fn service(&self, duckduckgo: DuckDuckGoProvider, bing: BingSearchProvider) -> SearchService {
        SearchService::with_providers(
            duckduckgo,
            bing,
            GoogleCseProvider::new(None, None, 2000),
            SearchConfig::default(),
        )
    }
}

pub async fn spawn_search_fixture() -> SearchFixture {
    let app = Router::new()
        .route("/lite", post(|| async { Html(LITE_PAGE) }))
        .route("/lite-empty", post(|| async { Html("<html><body><table></table></body></html>") }))
        .route("/html", get(|| async { Html(HTML_PAGE) }))
        .route("/html-empty", get(|| async { Html("<html><body></body></html>") }))
        .route("/bing", get(|| async { Html(BING_PAGE) }))
        .route("/bing-busy", get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }))
        .route(
            "/instant",
            get(|| async {
                Json(json!({
                    "Heading": "Rust",
                    "AbstractText": "Rust is a systems programming language.",
                    "RelatedTopics": [
                        {"Text": "Cargo - package manager", "FirstURL": "https://duckduckgo.com/Cargo"},
                        {"Name": "Category group without text"}
                    ]
                }))
            }),
        )
        .route("/instant-sparse", get(|| async { Json(json!({"Heading": "", "RelatedTopics": []})) }))
        .fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    SearchFixture {
        base: format!("http://{}", addr),
    }
}

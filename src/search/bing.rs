// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bing search provider
//!
//! Lightweight scrape of the public results page; no API key. Brittle by
//! nature, so failures surface as error entries rather than retries.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use super::duckduckgo::{MAX_SNIPPET_CHARS, MAX_TITLE_CHARS};
use super::provider::{build_client, SearchProvider};
use super::types::{SearchError, SearchResult};
use crate::page::text::{element_text, truncate_chars};

const BING_SEARCH_URL: &str = "https://www.bing.com/search";

/// Bing HTML results provider
pub struct BingSearchProvider {
    client: Client,
    timeout_ms: u64,
    search_url: String,
}

impl BingSearchProvider {
    pub fn new(timeout_ms: u64) -> Self {
        Self::with_endpoint(timeout_ms, BING_SEARCH_URL)
    }

    /// Use a different results page URL (for testing)
    pub fn with_endpoint(timeout_ms: u64, search_url: &str) -> Self {
        Self {
            client: build_client(timeout_ms),
            timeout_ms,
            search_url: search_url.to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for BingSearchProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("bing", e, self.timeout_ms))?;

        let status = response.status();
        if status == 429 {
            return Err(SearchError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                provider: "bing".to_string(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("bing", e, self.timeout_ms))?;

        parse_bing_html(&html, num_results)
    }

    fn name(&self) -> &'static str {
        "bing"
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse {
        provider: "bing".to_string(),
        message: format!("{:?}", e),
    })
}

/// `li.b_algo` blocks: title link from `h2 a`, snippet from the first `p`
fn parse_bing_html(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let title_link = selector("h2 a")?;
    let paragraph = selector("p")?;
    let caption = selector("div.b_caption p")?;

    let mut results = Vec::new();
    for block in document.select(&selector("li.b_algo")?) {
        let Some(anchor) = block.select(&title_link).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };
        let title = truncate_chars(&element_text(anchor), MAX_TITLE_CHARS).to_string();
        let snippet = block
            .select(&paragraph)
            .next()
            .or_else(|| block.select(&caption).next())
            .map(|p| truncate_chars(&element_text(p), MAX_SNIPPET_CHARS).to_string())
            .unwrap_or_default();
        if !title.is_empty() {
            results.push(SearchResult {
                title,
                url: href.to_string(),
                snippet,
            });
        }
        if results.len() >= max_results {
            break;
        }
    }
    Ok(results)
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Three tiers, tried in order and never retried:
//! 1. the lite endpoint (organic results)
//! 2. the HTML endpoint scrape
//! 3. the Instant Answer API (abstract plus related topics)

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::provider::{build_client, SearchProvider};
use super::types::{InstantAnswer, RelatedTopic, SearchError, SearchResult};
use crate::page::text::{element_text, truncate_chars};

const DDG_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";
const DDG_HTML_URL: &str = "https://duckduckgo.com/html/";
const DDG_INSTANT_URL: &str = "https://api.duckduckgo.com/";

const INSTANT_TIMEOUT_MS: u64 = 7000;

pub const MAX_TITLE_CHARS: usize = 240;
pub const MAX_SNIPPET_CHARS: usize = 400;

/// Which tier produced a DuckDuckGo answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuckDuckGoOutcome {
    Lite(Vec<SearchResult>),
    Html(Vec<SearchResult>),
    Instant(InstantAnswer),
}

impl DuckDuckGoOutcome {
    /// Flatten to a plain result list; instant answers use their related topics
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            Self::Lite(results) | Self::Html(results) => results,
            Self::Instant(answer) => answer.into_results(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstantResponse {
    #[serde(rename = "Abstract", default)]
    abstract_: Option<String>,
    #[serde(rename = "AbstractText", default)]
    abstract_text: Option<String>,
    #[serde(rename = "Heading", default)]
    heading: Option<String>,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<Value>,
}

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    timeout_ms: u64,
    lite_url: String,
    html_url: String,
    instant_url: String,
}

impl DuckDuckGoProvider {
    pub fn new(timeout_ms: u64) -> Self {
        Self::with_endpoints(timeout_ms, DDG_LITE_URL, DDG_HTML_URL, DDG_INSTANT_URL)
    }

    /// Point the three tiers at other endpoints (for testing)
    pub fn with_endpoints(timeout_ms: u64, lite_url: &str, html_url: &str, instant_url: &str) -> Self {
        Self {
            client: build_client(timeout_ms),
            timeout_ms,
            lite_url: lite_url.to_string(),
            html_url: html_url.to_string(),
            instant_url: instant_url.to_string(),
        }
    }

    /// Run the tier chain; only an Instant Answer failure is an error
    pub async fn search_tiers(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<DuckDuckGoOutcome, SearchError> {
        match self.search_lite(query, max_results).await {
            Ok(results) if !results.is_empty() => return Ok(DuckDuckGoOutcome::Lite(results)),
            Ok(_) => debug!("DuckDuckGo lite returned no results for '{}'", query),
            Err(e) => debug!("DuckDuckGo lite failed for '{}': {}", query, e),
        }

        match self.search_html(query, max_results).await {
            Ok(results) if !results.is_empty() => return Ok(DuckDuckGoOutcome::Html(results)),
            Ok(_) => debug!("DuckDuckGo html returned no results for '{}'", query),
            Err(e) => debug!("DuckDuckGo html failed for '{}': {}", query, e),
        }

        self.instant_answer(query, max_results)
            .await
            .map(DuckDuckGoOutcome::Instant)
    }

    async fn fetch_text(&self, request: reqwest::RequestBuilder) -> Result<String, SearchError> {
        let response = request
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("duckduckgo", e, self.timeout_ms))?;
        if !response.status().is_success() {
            return Err(SearchError::HttpStatus {
                provider: "duckduckgo".to_string(),
                status: response.status().as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("duckduckgo", e, self.timeout_ms))
    }

    pub async fn search_lite(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let html = self
            .fetch_text(self.client.post(&self.lite_url).form(&[("q", query)]))
            .await?;
        parse_lite_html(&html, max_results)
    }

    pub async fn search_html(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let html = self
            .fetch_text(self.client.get(&self.html_url).query(&[("q", query)]))
            .await?;
        parse_html_results(&html, max_results)
    }

    pub async fn instant_answer(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<InstantAnswer, SearchError> {
        let request = self
            .client
            .get(&self.instant_url)
            .timeout(Duration::from_millis(INSTANT_TIMEOUT_MS))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
                ("t", "webtool-mcp"),
            ]);
        let body = self.fetch_text(request).await?;
        let data: InstantResponse = serde_json::from_str(&body).map_err(|e| SearchError::Parse {
            provider: "duckduckgo".to_string(),
            message: e.to_string(),
        })?;
        Ok(instant_from_response(data, max_results))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.search_tiers(query, num_results).await?.into_results())
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn is_available(&self) -> bool {
        true // No API key needed
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse {
        provider: "duckduckgo".to_string(),
        message: format!("{:?}", e),
    })
}

fn clean_title(element: ElementRef<'_>) -> String {
    truncate_chars(&element_text(element), MAX_TITLE_CHARS).to_string()
}

fn clean_snippet(element: Option<ElementRef<'_>>) -> String {
    element
        .map(|e| truncate_chars(&element_text(e), MAX_SNIPPET_CHARS).to_string())
        .unwrap_or_default()
}

/// Lite page: `a.result-link` anchors paired in order with `td.result-snippet` cells
fn parse_lite_html(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let snippets: Vec<ElementRef<'_>> = document.select(&selector("td.result-snippet")?).collect();

    let mut results = Vec::new();
    for (i, anchor) in document.select(&selector("a.result-link")?).enumerate() {
        if results.len() >= max_results {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = unwrap_redirect(href);
        let title = clean_title(anchor);
        if url.is_empty() || title.is_empty() {
            continue;
        }
        results.push(SearchResult {
            title,
            url,
            snippet: clean_snippet(snippets.get(i).copied()),
        });
    }
    Ok(results)
}

/// HTML page: `a.result__a` anchors, snippet from the enclosing `div.result__body`
fn parse_html_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let snippet_selector = selector(".result__snippet")?;

    let mut results = Vec::new();
    for anchor in document.select(&selector("a.result__a")?) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let body = anchor.ancestors().filter_map(ElementRef::wrap).find(|e| {
            e.value().name() == "div" && e.value().classes().any(|c| c == "result__body")
        });
        let snippet = clean_snippet(body.and_then(|b| b.select(&snippet_selector).next()));
        let title = clean_title(anchor);
        let url = unwrap_redirect(href);
        if !title.is_empty() && !url.is_empty() {
            results.push(SearchResult {
                title,
                url,
                snippet,
            });
        }
        if results.len() >= max_results {
            break;
        }
    }
    Ok(results)
}

fn instant_from_response(data: InstantResponse, max_results: usize) -> InstantAnswer {
    let related = data
        .related_topics
        .iter()
        .take(max_results)
        .filter_map(|topic| {
            let title = topic.get("Text")?.as_str()?;
            let url = topic.get("FirstURL")?.as_str()?;
            (!title.is_empty() && !url.is_empty()).then(|| RelatedTopic {
                title: title.to_string(),
                url: url.to_string(),
            })
        })
        .collect();

    let abstract_text = data
        .abstract_
        .filter(|a| !a.is_empty())
        .or(data.abstract_text.filter(|a| !a.is_empty()));

    InstantAnswer {
        heading: data.heading.filter(|h| !h.is_empty()),
        abstract_text,
        related,
    }
}

/// Resolve DuckDuckGo's `/l/?uddg=` redirect links to their target
pub fn unwrap_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let Ok(parsed) = Url::parse(&absolute).or_else(|_| {
        Url::parse("https://duckduckgo.com/").and_then(|base| base.join(&absolute))
    }) else {
        return String::new();
    };
    if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        return target.into_owned();
    }
    if href.starts_with("http") {
        href.to_string()
    } else {
        String::new()
    }
}

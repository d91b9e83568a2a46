// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wikipedia REST summary lookups

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::{client_with_timeout, get_body, SourceError};

const SUMMARY_API: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";

/// Summary fields returned to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WikipediaSummary {
    pub title: Option<String>,
    pub description: Option<String>,
    pub extract: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: Option<String>,
    description: Option<String>,
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<DesktopUrls>,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: Option<String>,
}

pub struct WikipediaClient {
    client: Client,
    api_base: String,
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self::with_endpoint(SUMMARY_API)
    }

    /// Use a different summary API base (for testing); must end with `/`
    pub fn with_endpoint(api_base: &str) -> Self {
        Self {
            client: client_with_timeout(Duration::from_secs(5)),
            api_base: api_base.to_string(),
        }
    }

    /// Summary endpoint for a free-text query; spaces become underscores
    pub fn summary_url(&self, query: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| SourceError::Parse(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Parse(format!("cannot-be-a-base URL: {}", self.api_base)))?
            .pop_if_empty()
            .push(&query.replace(' ', "_"));
        Ok(url)
    }

    pub async fn summary(&self, query: &str) -> Result<WikipediaSummary, SourceError> {
        let url = self.summary_url(query)?;
        let body = get_body(self.client.get(url)).await?;
        let data: SummaryResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(WikipediaSummary {
            title: data.title,
            description: data.description,
            extract: data.extract,
            url: data
                .content_urls
                .and_then(|c| c.desktop)
                .and_then(|d| d.page),
        })
    }

    /// Tool payload: the summary, or `{"error": ...}`
    pub async fn search_wikipedia(&self, query: &str) -> Value {
        match self.summary(query).await {
            Ok(summary) => json!(summary),
            Err(e) => json!({ "error": format!("Wikipedia fetch failed: {}", e) }),
        }
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

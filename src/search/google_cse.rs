// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Custom Search JSON API provider

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::provider::{build_client, SearchProvider};
use super::types::{SearchError, SearchResult};

const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The API caps `num` at 10
const MAX_RESULTS_PER_REQUEST: usize = 10;

/// Google Custom Search provider (needs API key and engine id)
pub struct GoogleCseProvider {
    api_key: Option<String>,
    cse_id: Option<String>,
    client: Client,
    timeout_ms: u64,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl GoogleCseProvider {
    pub fn new(api_key: Option<String>, cse_id: Option<String>, timeout_ms: u64) -> Self {
        Self {
            api_key,
            cse_id,
            client: build_client(timeout_ms),
            timeout_ms,
            api_url: GOOGLE_CSE_URL.to_string(),
        }
    }

    /// Use a different API URL (for testing)
    pub fn with_endpoint(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for GoogleCseProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let (Some(key), Some(cx)) = (self.api_key.as_deref(), self.cse_id.as_deref()) else {
            return Err(SearchError::MissingCredentials);
        };
        let num = num_results.min(MAX_RESULTS_PER_REQUEST).to_string();

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("key", key), ("cx", cx), ("q", query), ("num", num.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("google_cse", e, self.timeout_ms))?;

        let status = response.status();
        if status == 429 {
            return Err(SearchError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                provider: "google_cse".to_string(),
                status: status.as_u16(),
            });
        }

        let data: CseResponse = response.json().await.map_err(|e| SearchError::Parse {
            provider: "google_cse".to_string(),
            message: e.to_string(),
        })?;

        Ok(data
            .items
            .into_iter()
            .take(num_results)
            .filter_map(|item| {
                Some(SearchResult {
                    title: item.title.filter(|t| !t.is_empty())?,
                    url: item.link.filter(|l| !l.is_empty())?,
                    snippet: item.snippet.unwrap_or_default(),
                })
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "google_cse"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some() && self.cse_id.is_some()
    }
}

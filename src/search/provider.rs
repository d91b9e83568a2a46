// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::{SearchError, SearchResult};

/// Browser-like User-Agent; engines block obvious bots
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 webtool-mcp";

/// HTTP client shared by the scraping providers
pub fn build_client(timeout_ms: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Trait for implementing search providers
///
/// Each engine returns the same `{title, url, snippet}` list or a structured
/// error; the search service never looks behind this contract.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search
    ///
    /// # Arguments
    /// * `query` - The search query string
    /// * `num_results` - Maximum number of results to return
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Engine name as used in the `engine` argument
    fn name(&self) -> &'static str;

    /// Check if the provider is usable (credentials present, etc.)
    fn is_available(&self) -> bool;
}

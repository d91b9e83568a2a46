// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for web search functionality

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// A single organic search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title of the search result
    pub title: String,
    /// URL of the search result
    pub url: String,
    /// Snippet/description of the search result
    #[serde(default)]
    pub snippet: String,
}

/// A related topic from the DuckDuckGo Instant Answer API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTopic {
    pub title: String,
    pub url: String,
}

/// Instant Answer payload (last DuckDuckGo tier)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantAnswer {
    pub heading: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub related: Vec<RelatedTopic>,
}

impl InstantAnswer {
    /// True when neither an abstract nor related topics came back
    pub fn is_sparse(&self) -> bool {
        self.abstract_text.as_deref().map_or(true, str::is_empty) && self.related.is_empty()
    }

    /// Related topics as results, each carrying the abstract as snippet
    pub fn into_results(self) -> Vec<SearchResult> {
        let snippet = self.abstract_text.unwrap_or_default();
        self.related
            .into_iter()
            .filter(|topic| !topic.title.is_empty() && !topic.url.is_empty())
            .map(|topic| SearchResult {
                title: topic.title,
                url: topic.url,
                snippet: snippet.clone(),
            })
            .collect()
    }
}

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Outbound search budget exhausted
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Transport failure talking to the provider
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    /// Non-success HTTP status from the provider
    #[error("{provider} returned HTTP {status}")]
    HttpStatus { provider: String, status: u16 },

    /// Search request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Provider response could not be parsed
    #[error("{provider} response parse error: {message}")]
    Parse { provider: String, message: String },

    /// Google Custom Search is not configured
    #[error("Missing GOOGLE_API_KEY or GOOGLE_CSE_ID env vars")]
    MissingCredentials,

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Reason the query is invalid
        reason: String,
    },
}

impl SearchError {
    /// Map a reqwest error, distinguishing timeouts
    pub fn from_reqwest(provider: &str, err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else {
            Self::Request {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// JSON list for one engine: the results, or a single `{"error": ...}` entry
pub fn engine_results_json(engine: &str, outcome: Result<Vec<SearchResult>, SearchError>) -> Value {
    match outcome {
        Ok(results) => json!(results),
        Err(SearchError::MissingCredentials) => {
            json!([{ "error": SearchError::MissingCredentials.to_string() }])
        }
        Err(e) => json!([{ "error": format!("{}_failed: {}", engine, e) }]),
    }
}

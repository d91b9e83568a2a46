// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Live HTTP page fetching
//!
//! No caching or rate limiting happens here; `PageService` layers those on
//! top. Link-follow hops call this directly.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; webtool-mcp/1.0)";

/// Page fetch error types
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Could not fetch {url}: invalid URL ({reason})")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not fetch {url}: timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Could not fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not fetch {url}: {message}")]
    Http { url: String, message: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Plain GET fetcher with a fixed timeout
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// Only absolute http(s) URLs are fetched
    pub fn validate_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !["http", "https"].contains(&parsed.scheme()) {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(parsed)
    }

    /// Fetch the raw body of `url`; non-2xx statuses are errors
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Self::validate_url(url.trim())?;
        debug!("Fetching page: {}", parsed);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                FetchError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        info!("Fetched {} bytes from: {}", body.len(), url);
        Ok(body)
    }
}

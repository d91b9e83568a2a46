// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Thin clients for the auxiliary data tools: Wikipedia summaries, Latvian
//! news headlines and stock quotes

pub mod news;
pub mod stocks;
pub mod wikipedia;

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub use news::{format_news, NewsClient, NewsItem, DEFAULT_NEWS_LIMIT};
pub use stocks::{parse_symbols, StockClient};
pub use wikipedia::{WikipediaClient, WikipediaSummary};

/// Failures talking to an external data source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    Request(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("invalid response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::HttpStatus(status.as_u16()),
            None => Self::Request(err.to_string()),
        }
    }
}

pub(crate) fn client_with_timeout(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent("webtool-mcp/1.0")
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` and return the body of a successful response
pub(crate) async fn get_body(request: reqwest::RequestBuilder) -> Result<String, SourceError> {
    let response = request.send().await?.error_for_status()?;
    Ok(response.text().await?)
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for web search functionality

use std::env;

/// Configuration for web search functionality
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Outbound engine requests per minute (0 = unlimited)
    pub rate_limit_per_minute: u32,
    /// Default number of results per engine
    pub default_num_results: usize,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Google Custom Search API key
    pub google_api_key: Option<String>,
    /// Google Custom Search engine id
    pub google_cse_id: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            rate_limit_per_minute: env::var("WEBTOOL_SEARCH_RATE_PER_MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            google_cse_id: non_empty_var("GOOGLE_CSE_ID"),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_num_results == 0 {
            return Err("Default result count must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Both Google Custom Search credentials are present
    pub fn has_google_cse(&self) -> bool {
        self.google_api_key.is_some() && self.google_cse_id.is_some()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 120,
            default_num_results: 5,
            request_timeout_ms: 10000,
            google_api_key: None,
            google_cse_id: None,
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for page fetching, caching and fetch rate limiting

use std::env;
use std::time::Duration;

/// Settings for the `fetch_url` pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Page-body cache TTL in seconds
    pub html_cache_ttl_secs: u64,
    /// Page-body cache capacity (0 disables caching)
    pub html_cache_size: usize,
    /// Rendered outline cache TTL in seconds
    pub outline_cache_ttl_secs: u64,
    /// Rendered outline cache capacity
    pub outline_cache_size: usize,
    /// Live network fetches allowed per minute (<= 0 means unlimited)
    pub fetch_rate_per_min: i64,
    /// Timeout for a single page fetch in seconds
    pub fetch_timeout_secs: u64,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl PageConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let html_cache_size =
            env_parse("WEBTOOL_HTML_CACHE_SIZE").unwrap_or(defaults.html_cache_size);
        Self {
            html_cache_ttl_secs: env_parse("WEBTOOL_CACHE_TTL")
                .unwrap_or(defaults.html_cache_ttl_secs),
            html_cache_size,
            outline_cache_ttl_secs: env_parse("WEBTOOL_OUTLINE_CACHE_TTL")
                .unwrap_or(defaults.outline_cache_ttl_secs),
            // outline cache follows the body cache size unless set
            outline_cache_size: env_parse("WEBTOOL_OUTLINE_CACHE_SIZE").unwrap_or(html_cache_size),
            fetch_rate_per_min: env_parse("WEBTOOL_FETCH_URL_RATE_PER_MIN")
                .unwrap_or(defaults.fetch_rate_per_min),
            fetch_timeout_secs: env_parse("WEBTOOL_FETCH_TIMEOUT_SECS")
                .unwrap_or(defaults.fetch_timeout_secs),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("Fetch timeout must be greater than 0".to_string());
        }
        if self.html_cache_size > 0 && self.html_cache_ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0 when caching is enabled".to_string());
        }
        if self.outline_cache_size > 0 && self.outline_cache_ttl_secs == 0 {
            return Err("Outline cache TTL must be greater than 0 when caching is enabled".to_string());
        }
        Ok(())
    }

    pub fn html_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.html_cache_ttl_secs)
    }

    pub fn outline_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.outline_cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            html_cache_ttl_secs: 300,
            html_cache_size: 64,
            outline_cache_ttl_secs: 300,
            outline_cache_size: 64,
            fetch_rate_per_min: 60,
            fetch_timeout_secs: 10,
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service orchestration
//!
//! Coordinates the engine providers and the outbound rate limiter, and shapes
//! their results into the JSON payloads the search tools return.

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::bing::BingSearchProvider;
use super::config::SearchConfig;
use super::duckduckgo::{DuckDuckGoOutcome, DuckDuckGoProvider};
use super::google_cse::GoogleCseProvider;
use super::provider::SearchProvider;
use super::rate_limiter::SearchRateLimiter;
use super::types::{engine_results_json, SearchError, SearchResult};

pub const SUPPORTED_ENGINES: &[&str] = &["duckduckgo", "bing", "google_cse", "multi"];
const DEFAULT_MULTI_ENGINES: &[&str] = &["duckduckgo", "bing"];
const QUICK_SEARCH_RESULTS: usize = 3;
const SPARSE_INSTANT_NOTE: &str =
    "Instant Answer returned minimal data; consider alternate engine via web_search tool.";

fn empty_query() -> Value {
    json!({ "error": "Empty query" })
}

/// Main search service that orchestrates providers and rate limiting
pub struct SearchService {
    duckduckgo: DuckDuckGoProvider,
    bing: BingSearchProvider,
    google: GoogleCseProvider,
    rate_limiter: SearchRateLimiter,
    config: SearchConfig,
}

impl SearchService {
    /// Create a new search service from configuration
    pub fn new(config: SearchConfig) -> Self {
        let timeout_ms = config.request_timeout_ms;
        if config.has_google_cse() {
            debug!("Google Custom Search provider enabled");
        }
        Self::with_providers(
            DuckDuckGoProvider::new(timeout_ms),
            BingSearchProvider::new(timeout_ms),
            GoogleCseProvider::new(
                config.google_api_key.clone(),
                config.google_cse_id.clone(),
                timeout_ms,
            ),
            config,
        )
    }

    /// Assemble with pre-built providers (tests point them at local fixtures)
    pub fn with_providers(
        duckduckgo: DuckDuckGoProvider,
        bing: BingSearchProvider,
        google: GoogleCseProvider,
        config: SearchConfig,
    ) -> Self {
        Self {
            duckduckgo,
            bing,
            google,
            rate_limiter: SearchRateLimiter::new(config.rate_limit_per_minute),
            config,
        }
    }

    pub fn default_num_results(&self) -> usize {
        self.config.default_num_results
    }

    fn provider(&self, engine: &str) -> Option<&dyn SearchProvider> {
        match engine {
            "duckduckgo" => Some(&self.duckduckgo),
            "bing" => Some(&self.bing),
            "google_cse" => Some(&self.google),
            _ => None,
        }
    }

    /// One rate-limited engine call
    async fn run_engine(
        &self,
        provider: &dyn SearchProvider,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if let Err(e) = self.rate_limiter.check() {
            warn!("Search rate limit reached, skipping {}", provider.name());
            return Err(e);
        }
        let results = provider.search(query, max_results).await?;
        info!(
            "{} returned {} results for '{}'",
            provider.name(),
            results.len(),
            query
        );
        Ok(results)
    }

    async fn engine_json(&self, engine: &str, query: &str, max_results: usize) -> Value {
        match self.provider(engine) {
            Some(provider) => {
                engine_results_json(engine, self.run_engine(provider, query, max_results).await)
            }
            None => json!([{ "error": "unsupported_engine" }]),
        }
    }

    /// DuckDuckGo tier chain with the tier recorded in `engine` and `source`
    pub async fn search_duckduckgo(&self, query: &str, max_results: usize) -> Value {
        if query.trim().is_empty() {
            return empty_query();
        }
        if let Err(e) = self.rate_limiter.check() {
            return json!({ "error": format!("DuckDuckGo request failed: {}", e) });
        }

        match self.duckduckgo.search_tiers(query, max_results).await {
            Ok(DuckDuckGoOutcome::Lite(results)) => json!({
                "query": query,
                "engine": "duckduckgo",
                "results": results,
                "source": "duckduckgo lite",
            }),
            Ok(DuckDuckGoOutcome::Html(results)) => json!({
                "query": query,
                "engine": "duckduckgo_html",
                "results": results,
                "source": "duckduckgo html scrape",
            }),
            Ok(DuckDuckGoOutcome::Instant(answer)) => {
                let sparse = answer.is_sparse();
                let mut payload = json!({
                    "query": query,
                    "engine": "duckduckgo_instant",
                    "heading": answer.heading,
                    "abstract": answer.abstract_text,
                    "related": answer.related,
                    "source": "DuckDuckGo Instant Answer",
                });
                if sparse {
                    payload["note"] = json!(SPARSE_INSTANT_NOTE);
                }
                payload
            }
            Err(e) => json!({ "error": format!("DuckDuckGo request failed: {}", e) }),
        }
    }

    /// Unified multi-engine search
    ///
    /// `engine` defaults to duckduckgo; `multi` queries `engines` (default
    /// duckduckgo and bing) and groups results per engine name.
    pub async fn web_search(
        &self,
        query: &str,
        engine: Option<&str>,
        max_results: usize,
        engines: Option<&[String]>,
    ) -> Value {
        if query.trim().is_empty() {
            return empty_query();
        }
        let engine = engine
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or("duckduckgo")
            .to_lowercase();

        if engine == "multi" {
            let selected: Vec<String> = match engines {
                Some(list) if !list.is_empty() => list.to_vec(),
                _ => DEFAULT_MULTI_ENGINES.iter().map(|e| e.to_string()).collect(),
            };
            let mut aggregate = Map::new();
            for name in selected {
                let results = self.engine_json(&name, query, max_results).await;
                aggregate.insert(name, results);
            }
            return json!({
                "query": query,
                "engine": "multi",
                "results": aggregate,
                "source": "web_search",
            });
        }

        if self.provider(&engine).is_none() {
            return json!({
                "error": format!("Unsupported engine '{}'", engine),
                "supported": SUPPORTED_ENGINES,
            });
        }

        json!({
            "query": query,
            "engine": engine,
            "results": self.engine_json(&engine, query, max_results).await,
            "source": "web_search",
        })
    }

    /// Three DuckDuckGo results, or Bing's when DuckDuckGo yields none
    pub async fn quick_search(&self, query: &str) -> Value {
        if query.trim().is_empty() {
            return empty_query();
        }
        match self
            .run_engine(&self.duckduckgo, query, QUICK_SEARCH_RESULTS)
            .await
        {
            Ok(results) if !results.is_empty() => {
                return json!({
                    "query": query,
                    "engine": "duckduckgo",
                    "results": results,
                    "source": "quick_search",
                });
            }
            Ok(_) => debug!("quick_search: duckduckgo empty, falling back to bing"),
            Err(e) => debug!("quick_search: duckduckgo failed ({}), falling back to bing", e),
        }

        json!({
            "query": query,
            "engine": "bing",
            "results": self.engine_json("bing", query, QUICK_SEARCH_RESULTS).await,
            "source": "quick_search",
        })
    }
}

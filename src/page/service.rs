// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! `fetch_url` orchestration
//!
//! Wires the body cache, fetch rate limiter, extractor/renderer, outline cache
//! and link follower together. Every outcome, including failures, comes back
//! as tool text.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::cache::{CacheStats, PageCache};
use super::config::PageConfig;
use super::extractor::ExtractionError;
use super::fetcher::{FetchError, PageFetcher};
use super::follow::{history_block, resolve_link, LinkResolutionError};
use super::rate_limiter::FetchRateLimiter;
use super::render::render_page;
use super::text::raw_snippet;
use super::types::{FetchUrlRequest, RenderMode};

const HTML_HIT: &str = "html_hit";
const OUTLINE_HIT: &str = "outline_hit";

const FOLLOW_BASE_SNIPPET_CHARS: usize = 800;
const FOLLOW_TARGET_SNIPPET_CHARS: usize = 1000;
const PARSER_FALLBACK_SNIPPET_CHARS: usize = 1200;

/// Failures on the page pipeline
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Rate limit exceeded: max {limit} fetch_url network requests per minute. Try later or rely on cached outline/chunks.")]
    RateLimitExceeded { limit: i64 },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    LinkResolution(#[from] LinkResolutionError),
}

/// Counters exposed on the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PageServiceStats {
    pub html_cache: CacheStats,
    pub outline_cache: CacheStats,
    pub fetch_rate_per_min: i64,
    pub fetches_in_window: usize,
}

/// Outline cache key for a requested URL
pub fn outline_cache_key(url: &str) -> String {
    format!("outline::{}", url.trim())
}

/// Tool text when a page parses but cannot be rendered
pub fn parser_fallback_text(error: &ExtractionError, url: &str, html: &str) -> String {
    format!(
        "Parser error, fallback raw snippet. Error: {}\nSource: {}\nSnippet: {}",
        error,
        url,
        raw_snippet(html, PARSER_FALLBACK_SNIPPET_CHARS)
    )
}

/// Same as [`parser_fallback_text`] for the target of a link follow
pub fn followed_parser_fallback_text(error: &ExtractionError, url: &str, html: &str) -> String {
    format!(
        "Parser error on followed page: {}\nSource: {}\nSnippet: {}",
        error,
        url,
        raw_snippet(html, FOLLOW_TARGET_SNIPPET_CHARS)
    )
}

/// Insert `cache_status: a,b` after the first line that is exactly `META`
///
/// Without such a line a `META` + status block is prepended.
pub fn annotate_cache_status(text: &str, statuses: &[&str]) -> String {
    if statuses.is_empty() {
        return text.to_string();
    }
    let status_line = format!("cache_status: {}", statuses.join(","));
    let mut lines = Vec::new();
    let mut inserted = false;
    for line in text.split('\n') {
        lines.push(line);
        if !inserted && line == "META" {
            lines.push(status_line.as_str());
            inserted = true;
        }
    }
    if inserted {
        lines.join("\n")
    } else {
        format!("META\n{}\n{}", status_line, text)
    }
}

/// Shared page pipeline, constructed once and handed to request handlers
pub struct PageService {
    fetcher: PageFetcher,
    html_cache: PageCache,
    outline_cache: PageCache,
    limiter: FetchRateLimiter,
}

impl PageService {
    pub fn new(config: &PageConfig) -> Result<Self, PageError> {
        Ok(Self::with_parts(
            PageFetcher::new(config.fetch_timeout())?,
            PageCache::new(config.html_cache_size, config.html_cache_ttl()),
            PageCache::new(config.outline_cache_size, config.outline_cache_ttl()),
            FetchRateLimiter::new(config.fetch_rate_per_min),
        ))
    }

    /// Assemble from pre-built parts (tests use short windows and TTLs)
    pub fn with_parts(
        fetcher: PageFetcher,
        html_cache: PageCache,
        outline_cache: PageCache,
        limiter: FetchRateLimiter,
    ) -> Self {
        Self {
            fetcher,
            html_cache,
            outline_cache,
            limiter,
        }
    }

    /// Live fetch with no cache and no rate limiting
    pub async fn fetch_live(&self, url: &str) -> Result<String, FetchError> {
        self.fetcher.fetch(url).await
    }

    /// Body for `url` and whether it came from the cache
    ///
    /// Only cache misses consult the rate limiter. Empty bodies are not cached.
    pub async fn cached_fetch_html(&self, url: &str) -> Result<(String, bool), PageError> {
        let key = url.trim();
        if let Some(html) = self.html_cache.get(key) {
            debug!("HTML cache hit for: {}", key);
            return Ok((html, true));
        }

        if !self.limiter.try_acquire() {
            warn!(
                "fetch_url rate limit reached ({} per minute), rejecting {}",
                self.limiter.limit(),
                key
            );
            return Err(PageError::RateLimitExceeded {
                limit: self.limiter.limit(),
            });
        }

        let html = self.fetcher.fetch(url).await?;
        if !html.is_empty() {
            self.html_cache.put(key, html.as_str());
        }
        Ok((html, false))
    }

    /// Run the `fetch_url` tool and produce its text result
    pub async fn fetch_url_tool(&self, request: &FetchUrlRequest) -> String {
        let url = request.url.as_str();
        let mut statuses: Vec<&str> = Vec::new();

        let (html, html_hit) = match self.cached_fetch_html(url).await {
            Ok(found) => found,
            Err(e) => return format!("Error fetching URL: {}", e),
        };
        if html_hit {
            statuses.push(HTML_HIT);
        }

        let plain_outline = request.is_plain_outline();
        if plain_outline {
            if let Some(cached) = self.outline_cache.get(&outline_cache_key(url)) {
                debug!("Outline cache hit for: {}", url);
                statuses.push(OUTLINE_HIT);
                return annotate_cache_status(&cached, &statuses);
            }
        }

        let text = match (&request.link_id, &request.chunk_id) {
            (Some(link_id), None) => self.follow_link(&html, url, link_id, request.mode).await,
            _ => match render_page(&html, url, request.chunk_id.as_deref(), request.mode) {
                Ok(text) => {
                    if plain_outline {
                        self.outline_cache.put(outline_cache_key(url), text.as_str());
                        debug!("Stored outline cache for {}", url);
                    }
                    text
                }
                Err(e) => {
                    error!("Page render failed for {}: {}", url, e);
                    parser_fallback_text(&e, url, &html)
                }
            },
        };

        annotate_cache_status(&text, &statuses)
    }

    /// Single-hop follow; the target fetch is always live
    async fn follow_link(
        &self,
        html: &str,
        base_url: &str,
        link_id: &str,
        mode: Option<RenderMode>,
    ) -> String {
        let link = match resolve_link(html, base_url, link_id) {
            Ok(link) => link,
            Err(e) => {
                error!("Link follow failed for {} on {}: {}", link_id, base_url, e);
                return format!(
                    "Link follow error: {}\nBase page snippet: {}\nYou can retry with a different link_id or fetch without link_id.",
                    e,
                    raw_snippet(html, FOLLOW_BASE_SNIPPET_CHARS)
                );
            }
        };

        let target_html = match self.fetcher.fetch(&link.url).await {
            Ok(body) => body,
            Err(e) => return format!("Error following {} → {}: {}", link_id, link.url, e),
        };
        info!("Followed {} from {} to {}", link_id, base_url, link.url);

        let rendered = render_page(&target_html, &link.url, None, mode).unwrap_or_else(|e| {
            error!("Render of followed page {} failed: {}", link.url, e);
            followed_parser_fallback_text(&e, &link.url, &target_html)
        });

        format!("{}\n\n{}", history_block(base_url, link_id, &link), rendered)
    }

    pub fn stats(&self) -> PageServiceStats {
        PageServiceStats {
            html_cache: self.html_cache.stats(),
            outline_cache: self.outline_cache.stats(),
            fetch_rate_per_min: self.limiter.limit(),
            fetches_in_window: self.limiter.in_window(),
        }
    }
}

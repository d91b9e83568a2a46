// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structured page extraction and navigation
//!
//! Decomposes arbitrary HTML into an addressable outline of sections so a
//! model can page through a large document over several tool calls:
//! - Heading-bounded chunks (`sec-N`) and numbered page links (`L#`)
//! - Outline, focused-chunk and full digest views
//! - TTL LRU caches for page bodies and rendered outlines
//! - Sliding-window limit on live network fetches
//! - Single-hop link following with provenance

pub mod cache;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod follow;
pub mod rate_limiter;
pub mod render;
pub mod service;
pub mod text;
pub mod types;

pub use cache::{CacheStats, PageCache};
pub use config::PageConfig;
pub use extractor::{extract_page, ExtractionError};
pub use fetcher::{FetchError, PageFetcher};
pub use follow::LinkResolutionError;
pub use rate_limiter::FetchRateLimiter;
pub use render::{render_page, render_page_at};
pub use service::{annotate_cache_status, PageError, PageService, PageServiceStats};
pub use types::{Chunk, Entities, ExtractedPage, FetchUrlRequest, Heading, Link, RenderMode};

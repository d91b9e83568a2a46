// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search tools
//!
//! Backs the `web_search`, `quick_search` and `search_duckduckgo` tools:
//! - Engines behind one `SearchProvider` contract (DuckDuckGo, Bing, Google CSE)
//! - DuckDuckGo lite, HTML scrape and Instant Answer fallback chain
//! - Shared rate limit on outbound engine requests
//! - Per-engine failures reported as error entries, never as hard errors

pub mod bing;
pub mod config;
pub mod duckduckgo;
pub mod google_cse;
pub mod provider;
pub mod rate_limiter;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use provider::SearchProvider;
pub use service::SearchService;
pub use types::{InstantAnswer, SearchError, SearchResult};

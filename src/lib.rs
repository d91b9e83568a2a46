// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod mcp;
pub mod page;
pub mod search;
pub mod sources;
pub mod version;

pub use mcp::{SystemPrompt, ToolDispatcher};
pub use page::{FetchUrlRequest, PageConfig, PageService};
pub use search::{SearchConfig, SearchService};

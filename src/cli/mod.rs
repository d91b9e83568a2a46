// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::{start_server, AppState};
use crate::mcp::{SystemPrompt, ToolDispatcher};
use crate::page::{PageConfig, PageService};
use crate::search::{SearchConfig, SearchService};
use crate::version;

/// webtool MCP server
#[derive(Parser, Debug, Clone)]
#[command(name = "webtool-mcp")]
#[command(version = version::SERVER_VERSION)]
#[command(about = "MCP tool server for page extraction, web search, news and stock quotes", long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "WEBTOOL_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "WEBTOOL_PORT", default_value_t = 5000)]
    pub port: u16,

    /// System prompt file served by get_system_prompt
    #[arg(long, env = "WEBTOOL_SYSPROMPT_PATH", default_value = "sysprompt.md")]
    pub sysprompt: PathBuf,
}

impl Cli {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Build every service from the environment and serve until Ctrl+C
pub async fn execute(cli: Cli) -> Result<()> {
    let page_config = PageConfig::from_env();
    page_config
        .validate()
        .map_err(|e| anyhow!("invalid page configuration: {}", e))?;
    let search_config = SearchConfig::from_env();
    search_config
        .validate()
        .map_err(|e| anyhow!("invalid search configuration: {}", e))?;

    info!(
        "Page cache: {} entries / {}s, outline cache: {} entries / {}s, fetch limit {}/min",
        page_config.html_cache_size,
        page_config.html_cache_ttl_secs,
        page_config.outline_cache_size,
        page_config.outline_cache_ttl_secs,
        page_config.fetch_rate_per_min
    );

    let pages = Arc::new(PageService::new(&page_config)?);
    let search = Arc::new(SearchService::new(search_config));
    let dispatcher = ToolDispatcher::new(pages, search, SystemPrompt::new(&cli.sysprompt));

    info!("Starting {}", version::get_version_string());
    start_server(cli.addr(), AppState::new(dispatcher)).await
}

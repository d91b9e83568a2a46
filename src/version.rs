// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the webtool MCP server

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "webtool-mcp";

/// Semantic version reported to MCP clients
pub const SERVER_VERSION: &str = "1.0.0";

/// MCP protocol revision answered to `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tools served by this build
pub const FEATURES: &[&str] = &[
    "fetch-url-outline",
    "fetch-url-chunks",
    "link-follow",
    "page-cache",
    "outline-cache",
    "fetch-rate-limit",
    "multi-engine-search",
    "wikipedia",
    "latvian-news",
    "stock-quotes",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {} (MCP {})", SERVER_NAME, SERVER_VERSION, PROTOCOL_VERSION)
}

/// Get version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "protocol": PROTOCOL_VERSION,
        "features": FEATURES,
    })
}

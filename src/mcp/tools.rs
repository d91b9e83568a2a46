// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tool catalogue: `tools/list` schemas and the legacy function listing

use serde_json::{json, Value};

use crate::version::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};

pub const TOOL_NAMES: &[&str] = &[
    "fetch_url",
    "search_wikipedia",
    "latvian_news",
    "search_duckduckgo",
    "web_search",
    "quick_search",
    "stock_quotes",
    "get_system_prompt",
];

/// Result of the `initialize` handshake
pub fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        "capabilities": { "tools": {} },
    })
}

/// Tool definitions with JSON Schema inputs
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "fetch_url",
            "description": "Fetch and summarize a webpage with outline, links, navigation, snippets, and chunk index. Optional: fetch a specific chunk, outline-only mode, or follow a link id (L#) from the page.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "HTTP or HTTPS URL (base page or target if not following)"},
                    "chunk_id": {"type": "string", "description": "Optional section id to return only that chunk (e.g., sec-3)"},
                    "section": {"type": "string", "description": "Alias for chunk_id"},
                    "mode": {"type": "string", "enum": ["outline"], "description": "outline = only META/OUTLINE/LINKS/CHUNKS/NEXT"},
                    "link_id": {"type": "string", "description": "Follow a link from the base page by id (e.g. L7)"}
                },
                "required": ["url"]
            }
        },
        {
            "name": "search_wikipedia",
            "description": "Get a short summary from Wikipedia",
            "inputSchema": {
                "type": "object",
                "properties": {"query": {"type": "string", "description": "Search query"}},
                "required": ["query"]
            }
        },
        {
            "name": "latvian_news",
            "description": "Latest Latvian news headlines or topic search (optional query).",
            "inputSchema": {
                "type": "object",
                "properties": {"query": {"type": "string", "description": "Optional topic term"}}
            }
        },
        {
            "name": "search_duckduckgo",
            "description": "DuckDuckGo search: organic results with HTML-scrape and Instant Answer fallbacks.",
            "inputSchema": {
                "type": "object",
                "properties": {"query": {"type": "string", "description": "Search phrase"}},
                "required": ["query"]
            }
        },
        {
            "name": "web_search",
            "description": "Multi-engine web search (duckduckgo, bing, google_cse, multi). Returns structured result list.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "engine": {"type": "string", "enum": ["duckduckgo", "bing", "google_cse", "multi"], "description": "Search engine (default duckduckgo)"},
                    "max_results": {"type": "number", "description": "Max results per engine (default 5)"},
                    "engines": {"type": "array", "items": {"type": "string"}, "description": "When engine=multi specify engines subset"}
                },
                "required": ["query"]
            }
        },
        {
            "name": "quick_search",
            "description": "Fast small-result search (duckduckgo→bing fallback) max 3 results for scoping.",
            "inputSchema": {
                "type": "object",
                "properties": {"query": {"type": "string", "description": "Search phrase"}},
                "required": ["query"]
            }
        },
        {
            "name": "stock_quotes",
            "description": "Fetch basic stock quotes for one or multiple symbols.",
            "inputSchema": {
                "type": "object",
                "properties": {"symbols": {"type": "string", "description": "Comma or space separated symbols, e.g. AAPL MSFT"}},
                "required": ["symbols"]
            }
        },
        {
            "name": "get_system_prompt",
            "description": "Return the internal system prompt / guidance for tool usage.",
            "inputSchema": {"type": "object", "properties": {}}
        }
    ])
}

/// Function listing for legacy (non JSON-RPC) clients
pub fn available_functions_info() -> Value {
    json!({
        "status": "ok",
        "functions": {
            "fetch_url": {"args": {"url": "string", "chunk_id": "string?", "mode": "string? (outline)", "link_id": "string? (e.g. L7)"}},
            "search_wikipedia": {"args": {"query": "string"}},
            "latvian_news": {"args": {"query": "string?"}},
            "search_duckduckgo": {"args": {"query": "string"}},
            "stock_quotes": {"args": {"symbols": "string|list"}},
            "get_system_prompt": {"args": {}}
        },
        "usage": [
            {"name": "fetch_url", "arguments": {"url": "https://example.com"}},
            {"name": "fetch_url", "arguments": {"url": "https://example.com", "chunk_id": "sec-2"}},
            {"name": "fetch_url", "arguments": {"url": "https://example.com", "mode": "outline"}},
            {"name": "fetch_url", "arguments": {"url": "https://example.com", "link_id": "L3"}},
            {"name": "search_wikipedia", "arguments": {"query": "Python"}},
            {"name": "latvian_news", "arguments": {}},
            {"name": "latvian_news", "arguments": {"query": "tehnoloģijas"}},
            {"name": "search_duckduckgo", "arguments": {"query": "open source vector database"}},
            {"name": "quick_search", "arguments": {"query": "quick test query"}},
            {"name": "stock_quotes", "arguments": {"symbols": "AAPL, MSFT"}},
            {"name": "get_system_prompt", "arguments": {}}
        ]
    })
}

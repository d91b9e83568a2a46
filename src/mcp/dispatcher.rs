// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Routes MCP JSON-RPC calls and legacy payloads to the tool services

use serde_json::{json, Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use super::jsonrpc::{error_codes, text_content, Request, Response, INVALID_REQUEST_HINT};
use super::prompt::SystemPrompt;
use super::tools::{available_functions_info, initialize_result, tool_definitions};
use crate::page::{FetchUrlRequest, PageService, RenderMode};
use crate::search::SearchService;
use crate::sources::{format_news, NewsClient, StockClient, WikipediaClient, DEFAULT_NEWS_LIMIT};

const LEGACY_INFO_NAMES: &[&str] = &["initialize", "list_tools", "health", "info"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Unknown method '{0}'")]
    UnknownMethod(String),
}

impl DispatchError {
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownTool(_) | DispatchError::UnknownMethod(_) => {
                error_codes::METHOD_NOT_FOUND
            }
        }
    }
}

/// String argument; missing, null and non-string values read as absent
fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Non-empty string argument, also accepting numbers (`link_id: 7`)
fn id_arg(args: &Map<String, Value>, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn object_or_empty(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Normalise `fetch_url` arguments; `section` is an alias for `chunk_id`
pub fn fetch_request_from_args(args: &Map<String, Value>) -> FetchUrlRequest {
    FetchUrlRequest {
        url: str_arg(args, "url").unwrap_or_default().to_string(),
        chunk_id: id_arg(args, "chunk_id").or_else(|| id_arg(args, "section")),
        mode: RenderMode::parse(str_arg(args, "mode")),
        link_id: id_arg(args, "link_id"),
    }
}

fn engines_arg(args: &Map<String, Value>) -> Option<Vec<String>> {
    match args.get("engines")? {
        Value::Array(list) => Some(
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn to_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

/// Tool services shared by every request
pub struct ToolDispatcher {
    pages: Arc<PageService>,
    search: Arc<SearchService>,
    wikipedia: WikipediaClient,
    news: NewsClient,
    stocks: StockClient,
    prompt: SystemPrompt,
}

impl ToolDispatcher {
    pub fn new(pages: Arc<PageService>, search: Arc<SearchService>, prompt: SystemPrompt) -> Self {
        Self::with_sources(
            pages,
            search,
            WikipediaClient::new(),
            NewsClient::new(),
            StockClient::new(),
            prompt,
        )
    }

    /// Assemble with explicit data-source clients (tests point them at fixtures)
    pub fn with_sources(
        pages: Arc<PageService>,
        search: Arc<SearchService>,
        wikipedia: WikipediaClient,
        news: NewsClient,
        stocks: StockClient,
        prompt: SystemPrompt,
    ) -> Self {
        Self {
            pages,
            search,
            wikipedia,
            news,
            stocks,
            prompt,
        }
    }

    pub fn pages(&self) -> &PageService {
        &self.pages
    }

    /// Entry point for a decoded `POST /mcp` body
    ///
    /// JSON-RPC 2.0 messages get JSON-RPC responses; anything else is
    /// treated as a legacy `function`/`name` payload.
    pub async fn handle(&self, payload: &Value) -> Value {
        let response = match Request::from_value(payload) {
            Some(request) => serde_json::to_value(self.handle_rpc(&request).await),
            None => return self.handle_legacy(payload).await,
        };
        response.unwrap_or_else(|e| {
            error!("Failed to serialize JSON-RPC response: {}", e);
            json!({
                "jsonrpc": "2.0",
                "id": Value::Null,
                "error": {"code": error_codes::INTERNAL_ERROR, "message": "Internal error"},
            })
        })
    }

    pub async fn handle_rpc(&self, request: &Request) -> Response {
        let id = request.response_id();
        let method = request.method.as_deref().unwrap_or_default();
        let params = object_or_empty(request.params.as_ref());
        debug!("JSON-RPC method '{}'", method);

        let outcome = match method {
            "initialize" => Ok(initialize_result()),
            "tools/list" | "tools.list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" | "tools.call" => self.call_from_params(&params).await.map(text_content),
            other => Err(DispatchError::UnknownMethod(other.to_string())),
        };

        match outcome {
            Ok(result) => Response::success(id, result),
            Err(e) => Response::error(id, e.code(), e.to_string()),
        }
    }

    async fn call_from_params(&self, params: &Map<String, Value>) -> Result<String, DispatchError> {
        let name = ["name", "toolName", "function", "method"]
            .iter()
            .find_map(|key| str_arg(params, key).filter(|n| !n.is_empty()))
            .unwrap_or_default();
        let arguments = ["arguments", "args"]
            .iter()
            .find_map(|key| match params.get(*key) {
                Some(Value::Object(map)) if !map.is_empty() => Some(map.clone()),
                _ => None,
            })
            .unwrap_or_default();
        self.call_tool(name, &arguments).await
    }

    /// Run one tool and return its text content
    pub async fn call_tool(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<String, DispatchError> {
        let query = str_arg(args, "query").unwrap_or_default();
        let text = match name {
            "fetch_url" => {
                self.pages
                    .fetch_url_tool(&fetch_request_from_args(args))
                    .await
            }
            "search_wikipedia" => to_text(&self.wikipedia.search_wikipedia(query).await),
            "latvian_news" => {
                let query = str_arg(args, "query").filter(|q| !q.trim().is_empty());
                let payload = self.news.latvian_news(query, DEFAULT_NEWS_LIMIT).await;
                format_news(&payload, query)
            }
            "search_duckduckgo" => to_text(
                &self
                    .search
                    .search_duckduckgo(query, self.search.default_num_results())
                    .await,
            ),
            "web_search" => {
                let max_results = args
                    .get("max_results")
                    .and_then(Value::as_f64)
                    .filter(|n| *n >= 1.0)
                    .map(|n| n as usize)
                    .unwrap_or_else(|| self.search.default_num_results());
                let engines = engines_arg(args);
                to_text(
                    &self
                        .search
                        .web_search(query, str_arg(args, "engine"), max_results, engines.as_deref())
                        .await,
                )
            }
            "quick_search" => to_text(&self.search.quick_search(query).await),
            "stock_quotes" => {
                let symbols = args.get("symbols").cloned().unwrap_or(Value::Null);
                to_text(&self.stocks.stock_quotes(&symbols).await)
            }
            "get_system_prompt" => self.prompt.load(),
            other => return Err(DispatchError::UnknownTool(other.to_string())),
        };
        Ok(text)
    }

    /// Catalogue plus the head of the system prompt
    pub fn legacy_info(&self) -> Value {
        let mut info = available_functions_info();
        let head = self.prompt.head();
        info["system_prompt_head"] = if head.is_empty() {
            json!(["(failed to load system prompt)"])
        } else {
            json!(head)
        };
        info
    }

    /// `{"function": ..., "args": ...}` or `{"name": ..., "arguments": ...}`
    pub async fn handle_legacy(&self, payload: &Value) -> Value {
        let empty = Map::new();
        let data = payload.as_object().unwrap_or(&empty);

        let (name, args) = if data.contains_key("function") {
            (data.get("function"), object_or_empty(data.get("args")))
        } else if data.contains_key("name") {
            (data.get("name"), object_or_empty(data.get("arguments")))
        } else {
            (None, Map::new())
        };
        let name = name.and_then(Value::as_str).filter(|n| !n.is_empty());

        let Some(name) = name else {
            let response = Response::error_with_data(
                Value::Null,
                error_codes::INVALID_REQUEST,
                "Invalid Request",
                Some(json!({ "hint": INVALID_REQUEST_HINT })),
            );
            return serde_json::to_value(response).unwrap_or(Value::Null);
        };

        if LEGACY_INFO_NAMES.contains(&name) {
            return json!({ "response": self.legacy_info() });
        }

        let args = if args.is_empty() { data } else { &args };
        let query = str_arg(args, "query").unwrap_or_default();
        let result = match name {
            "fetch_url" => {
                let url = str_arg(args, "url").unwrap_or_default();
                match self.pages.fetch_live(url).await {
                    Ok(html) => json!({ "content": html }),
                    Err(e) => json!({ "error": e.to_string() }),
                }
            }
            "search_wikipedia" => self.wikipedia.search_wikipedia(query).await,
            "latvian_news" => {
                self.news
                    .latvian_news(Some(query), DEFAULT_NEWS_LIMIT)
                    .await
            }
            "get_system_prompt" => self.prompt.payload(),
            other => {
                error!("Unknown function '{}'", other);
                return json!({
                    "response": available_functions_info(),
                    "warning": format!("Unknown function '{}'", other),
                });
            }
        };
        json!({ "response": result })
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    body::Bytes,
    extract::State,
    http::{header::HeaderName, Uri},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::get,
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

use super::ApiError;
use crate::mcp::ToolDispatcher;
use crate::version;

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ToolDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // JSON-RPC and legacy tool calls; GET opens the SSE stream
        .route("/mcp", get(sse_handler).post(mcp_handler))
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = TcpListener::bind(addr).await?;

    info!("MCP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

/// Decode a request body leniently
///
/// Empty and falsy JSON bodies read as `{}`.
pub fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    };
    Ok(if falsy { json!({}) } else { value })
}

async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    debug!("Received MCP payload: {}", String::from_utf8_lossy(&body));
    let payload = parse_body(&body)?;
    Ok(Json(state.dispatcher.handle(&payload).await))
}

fn ready_stream() -> impl Stream<Item = Result<Event, Infallible>> {
    stream::once(async { Ok(Event::default().event("ready").data("{}")) }).chain(stream::pending())
}

async fn sse_handler() -> Response {
    let sse = Sse::new(ready_stream()).keep_alive(
        KeepAlive::new()
            .interval(SSE_KEEP_ALIVE)
            .text(" keep-alive"),
    );
    (
        [(HeaderName::from_static("x-accel-buffering"), "no")],
        sse,
    )
        .into_response()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = version::get_version_info();
    body["status"] = json!("ok");
    body["page"] = json!(state.dispatcher.pages().stats());
    Json(body)
}

async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

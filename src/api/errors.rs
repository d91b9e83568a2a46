// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::fmt;

use crate::mcp::jsonrpc::{error_codes, Response as RpcResponse, INVALID_REQUEST_HINT};

/// HTTP-level failures, always reported to clients as JSON-RPC error envelopes
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Body missing, not JSON, or not a request shape we understand
    InvalidRequest(String),
    NotFound(String),
}

impl ApiError {
    pub fn rpc_code(&self) -> i32 {
        match self {
            ApiError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            ApiError::NotFound(_) => error_codes::METHOD_NOT_FOUND,
        }
    }

    /// Invalid bodies answer 200 so strict JSON-RPC clients still parse them
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::OK,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn to_rpc_response(&self) -> RpcResponse {
        match self {
            ApiError::InvalidRequest(_) => RpcResponse::error_with_data(
                Value::Null,
                self.rpc_code(),
                "Invalid Request",
                Some(json!({ "hint": INVALID_REQUEST_HINT })),
            ),
            ApiError::NotFound(msg) => {
                RpcResponse::error(Value::Null, self.rpc_code(), msg.clone())
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_rpc_response())).into_response()
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! MCP protocol layer: JSON-RPC envelopes, tool catalogue, system prompt and
//! the dispatcher that routes calls to the tool services

pub mod dispatcher;
pub mod jsonrpc;
pub mod prompt;
pub mod tools;

pub use dispatcher::{fetch_request_from_args, DispatchError, ToolDispatcher};
pub use jsonrpc::{error_codes, Request, Response, RpcError};
pub use prompt::SystemPrompt;
pub use tools::{available_functions_info, initialize_result, tool_definitions, TOOL_NAMES};

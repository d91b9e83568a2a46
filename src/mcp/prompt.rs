// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! System prompt loading for the `get_system_prompt` tool

use regex::Regex;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::warn;

pub const PROMPT_VERSION: &str = "1.1";

const FALLBACK_PROMPT: &str = "You are an autonomous browsing and data assistant integrated with the MCP tool server webtool-mcp. (fallback minimal prompt)";

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```\n(.*?)```").expect("fence pattern compiles"))
}

/// Prompt text from file contents: the first fenced block, else the whole file
pub fn extract_prompt(contents: &str) -> String {
    match fenced_block().captures(contents).and_then(|caps| caps.get(1)) {
        Some(block) => block.as_str().trim().to_string(),
        None => contents.trim().to_string(),
    }
}

/// Reads the prompt file on every call so edits apply without a restart
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    path: PathBuf,
}

impl SystemPrompt {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> String {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => extract_prompt(&contents),
            Err(e) => {
                warn!("Could not read system prompt {}: {}", self.path.display(), e);
                FALLBACK_PROMPT.to_string()
            }
        }
    }

    /// `{"prompt": ..., "version": ...}`
    pub fn payload(&self) -> Value {
        json!({ "prompt": self.load(), "version": PROMPT_VERSION })
    }

    /// First six prompt lines, for legacy info responses
    pub fn head(&self) -> Vec<String> {
        self.load().lines().take(6).map(str::to_string).collect()
    }
}

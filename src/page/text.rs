// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text utilities shared by the extractor and renderer

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Node};
use std::collections::HashSet;
use std::sync::OnceLock;

use super::types::Entities;

/// Characters per estimated token
pub const TOKEN_EST_CHARS_PER: usize = 4;

const MAX_NAMES: usize = 25;
const MAX_YEARS: usize = 10;
const MAX_NUMBERS: usize = 15;

/// Elements whose text content is never part of the readable page
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "template"];

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,3})\b").expect("name pattern compiles")
    })
}

fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(20\d{2}|19\d{2})\b").expect("year pattern compiles"))
}

fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{2,}\b").expect("number pattern compiles"))
}

/// Collapse every whitespace run to one space and trim the ends
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix of at most `max_chars` characters (not bytes)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Heuristic token count: `max(1, chars / 4)`
pub fn token_estimate(text: &str) -> usize {
    (text.chars().count() / TOKEN_EST_CHARS_PER).max(1)
}

/// Collapsed text of an element, pieces joined by a space
///
/// Text inside script, style and template elements is skipped.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    // pre-order walk; raw-text subtrees are never entered
    let mut stack = vec![*element];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => pieces.push(&**text),
            value if is_raw_text_element(value) => {}
            _ => stack.extend(node.children().rev()),
        }
    }
    collapse(&pieces.join(" "))
}

fn is_raw_text_element(node: &Node) -> bool {
    match node {
        Node::Element(element) => RAW_TEXT_TAGS.contains(&element.name()),
        _ => false,
    }
}

/// Pattern-based names, years and numbers, deduplicated in first-seen order
pub fn extract_entities(full_text: &str) -> Entities {
    Entities {
        names: unique_matches(name_pattern(), full_text, MAX_NAMES),
        years: unique_matches(year_pattern(), full_text, MAX_YEARS),
        numbers: unique_matches(number_pattern(), full_text, MAX_NUMBERS),
    }
}

fn unique_matches(pattern: &Regex, text: &str, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in pattern.find_iter(text) {
        if out.len() >= limit {
            break;
        }
        if seen.insert(m.as_str()) {
            out.push(m.as_str().to_string());
        }
    }
    out
}

/// UTC timestamp in `YYYY-MM-DDTHH:MM:SSZ` form
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// First `max_chars` characters with newlines flattened, for error fallbacks
pub fn raw_snippet(html: &str, max_chars: usize) -> String {
    truncate_chars(html, max_chars).replace('\n', " ")
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Link-id addressing for single-hop follows
//!
//! A link id (`L7`, `l7` or `7`) is a 1-based index into the page links of the
//! base page, recomputed from its HTML on every request.

use regex::Regex;
use std::num::IntErrorKind;
use std::sync::OnceLock;
use thiserror::Error;

use super::extractor::{extract_page_links, ExtractionError};
use super::types::Link;

/// Errors resolving a link id against a base page
#[derive(Debug, Error)]
pub enum LinkResolutionError {
    #[error("Invalid link_id format: {0}")]
    InvalidFormat(String),

    #[error("link_id {link_id} out of range (1..{available})")]
    OutOfRange { link_id: String, available: usize },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

fn link_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[Ll]?(\d+)").expect("link id pattern compiles"))
}

/// Numeric index of a link id; trailing text after the digits is ignored
///
/// Indices too large for `usize` saturate so they report as out of range.
pub fn parse_link_id(link_id: &str) -> Result<usize, LinkResolutionError> {
    let digits = link_id_pattern()
        .captures(link_id.trim())
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| LinkResolutionError::InvalidFormat(link_id.to_string()))?;
    match digits.as_str().parse::<usize>() {
        Ok(index) => Ok(index),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
        Err(_) => Err(LinkResolutionError::InvalidFormat(link_id.to_string())),
    }
}

/// Pick the link a link id points at from an already extracted list
pub fn select_link<'a>(links: &'a [Link], link_id: &str) -> Result<&'a Link, LinkResolutionError> {
    let index = parse_link_id(link_id)?;
    if index == 0 || index > links.len() {
        return Err(LinkResolutionError::OutOfRange {
            link_id: link_id.to_string(),
            available: links.len(),
        });
    }
    Ok(&links[index - 1])
}

/// Re-extract the base page's links and resolve `link_id` against them
pub fn resolve_link(html: &str, base_url: &str, link_id: &str) -> Result<Link, LinkResolutionError> {
    let links = extract_page_links(html, base_url)?;
    select_link(&links, link_id).cloned()
}

/// Provenance header prepended to a followed page's render
pub fn history_block(from_url: &str, link_id: &str, followed: &Link) -> String {
    format!(
        "HISTORY\nfrom_page: {}\nfollowed: {} -> {}\nlink_text: {}",
        from_url, link_id, followed.url, followed.text
    )
}

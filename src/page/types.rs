// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for structured page extraction

use serde::{Deserialize, Serialize};

/// A heading (h1-h3) found inside the main content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading depth: 1, 2 or 3
    pub level: u8,
    /// Whitespace-collapsed heading text (never empty)
    pub title: String,
    /// Document-order position among the h1-h3 elements of the main root
    pub anchor: usize,
}

/// One addressable section of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// `sec-N`, 1-based, stable only within one extraction pass
    pub id: String,
    pub heading: String,
    pub level: u8,
    pub text: String,
    pub token_estimate: usize,
}

/// A hyperlink with resolved absolute URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Pattern-derived entities over the concatenated chunk text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    /// Capitalised word runs (at most 25)
    pub names: Vec<String>,
    /// Four-digit years 19xx/20xx (at most 10)
    pub years: Vec<String>,
    /// Numbers with two or more digits (at most 15)
    pub numbers: Vec<String>,
}

/// Everything one extraction pass produces from an HTML body
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<Heading>,
    pub chunks: Vec<Chunk>,
    pub page_links: Vec<Link>,
    pub nav_links: Vec<Link>,
}

impl ExtractedPage {
    /// Chunk texts joined the way entity extraction expects them
    pub fn full_text(&self) -> String {
        self.chunks
            .iter()
            .filter(|c| !c.text.is_empty())
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" \n")
    }

    /// Case-insensitive chunk lookup by id
    pub fn find_chunk(&self, chunk_id: &str) -> Option<(usize, &Chunk)> {
        self.chunks
            .iter()
            .enumerate()
            .find(|(_, c)| c.id.eq_ignore_ascii_case(chunk_id))
    }
}

/// Which textual view to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Outline,
}

impl RenderMode {
    /// Parse the caller-supplied `mode` argument; anything but `outline` is ignored
    pub fn parse(mode: Option<&str>) -> Option<Self> {
        match mode.map(str::trim) {
            Some("outline") => Some(Self::Outline),
            _ => None,
        }
    }
}

/// Arguments of the `fetch_url` tool after normalisation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchUrlRequest {
    pub url: String,
    pub chunk_id: Option<String>,
    pub mode: Option<RenderMode>,
    pub link_id: Option<String>,
}

impl FetchUrlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_chunk(mut self, chunk_id: impl Into<String>) -> Self {
        self.chunk_id = Some(chunk_id.into());
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_link(mut self, link_id: impl Into<String>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }

    /// Outline requests without chunk or link are served from the outline cache
    pub fn is_plain_outline(&self) -> bool {
        self.mode == Some(RenderMode::Outline) && self.chunk_id.is_none() && self.link_id.is_none()
    }
}

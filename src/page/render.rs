// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document renderer
//!
//! Turns one extraction pass into a sectioned text view: outline, a single
//! focused chunk, or the full digest. Sections are separated by one blank
//! line; optional lines that would be empty are left out.

use chrono::{DateTime, Utc};

use super::extractor::{extract_page, ExtractionError};
use super::text::{extract_entities, iso_timestamp, truncate_chars};
use super::types::{Chunk, ExtractedPage, Link, RenderMode};

const OUTLINE_FULL_CAP: usize = 80;
const OUTLINE_FOCUS_CAP: usize = 40;
const LINKS_OUTLINE_CAP: usize = 40;
const LINKS_FULL_CAP: usize = 120;
const LINKS_LOCAL_CAP: usize = 40;
const NAV_CAP: usize = 40;
const CHUNK_INDEX_OUTLINE_CAP: usize = 60;
const CHUNK_INDEX_FULL_CAP: usize = 80;
const KEYPOINT_CHUNKS: usize = 8;
const KEYPOINT_CAP: usize = 12;
const KEYPOINT_CHARS: usize = 180;
const SNIPPET_CHUNKS: usize = 10;
const SNIPPET_CHARS: usize = 260;
const FOCUS_TEXT_CHARS: usize = 5000;
const HEADING_INDEX_CHARS: usize = 120;

const NEXT_OUTLINE: &str = "Request a section id (e.g. sec-2) or follow a link (e.g. L5).";
const NEXT_FOCUS: &str =
    "You can request another section by id (e.g. sec-2) or follow a link (e.g. L5).";
const NEXT_FULL: &str =
    "Request a section via its id (e.g. sec-2) or ask to follow a specific link (e.g. L7).";

/// Render `html` fetched from `url`, timestamped now
pub fn render_page(
    html: &str,
    url: &str,
    chunk_id: Option<&str>,
    mode: Option<RenderMode>,
) -> Result<String, ExtractionError> {
    render_page_at(html, url, chunk_id, mode, Utc::now())
}

/// Render with an explicit fetch timestamp
///
/// An empty body yields a minimal `META` block and never fails. `mode=outline`
/// wins over `chunk_id`; a chunk id that matches nothing falls back to the
/// full view.
pub fn render_page_at(
    html: &str,
    url: &str,
    chunk_id: Option<&str>,
    mode: Option<RenderMode>,
    fetched_at: DateTime<Utc>,
) -> Result<String, ExtractionError> {
    if html.is_empty() {
        return Ok(render_empty(url));
    }

    let page = extract_page(html, url)?;
    let meta = meta_section(&page, url, fetched_at);

    if mode == Some(RenderMode::Outline) {
        return Ok(render_outline(&page, meta));
    }

    if let Some((idx, chunk)) = chunk_id.and_then(|id| page.find_chunk(id)) {
        return Ok(render_focus(&page, meta, idx, chunk));
    }

    Ok(render_full(&page, meta))
}

/// View for a page that came back with no body
pub fn render_empty(url: &str) -> String {
    format!("META\nsource: {}\nstatus: empty", url)
}

fn meta_section(page: &ExtractedPage, url: &str, fetched_at: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        "META".to_string(),
        format!("source: {}", url),
        format!("fetched_at: {}", iso_timestamp(fetched_at)),
        format!("title: {}", page.title),
    ];
    if !page.meta_description.is_empty() {
        lines.push(format!("description: {}", page.meta_description));
    }
    lines
}

fn titled(title: &str, body: impl IntoIterator<Item = String>) -> Vec<String> {
    std::iter::once(title.to_string()).chain(body).collect()
}

fn or_placeholder(lines: Vec<String>, placeholder: &str) -> Vec<String> {
    if lines.is_empty() {
        vec![placeholder.to_string()]
    } else {
        lines
    }
}

fn join_sections(sections: Vec<Vec<String>>) -> String {
    sections
        .into_iter()
        .map(|section| section.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Indented `sec-N Heading` lines, two spaces per level below 1
pub fn outline_lines(chunks: &[Chunk]) -> Vec<String> {
    chunks
        .iter()
        .map(|c| {
            let indent = "  ".repeat(usize::from(c.level.saturating_sub(1)));
            format!("{}{} {}", indent, c.id, c.heading)
        })
        .collect()
}

pub fn link_line(index: usize, link: &Link) -> String {
    format!("[L{}] {} — {}", index, link.text, link.url)
}

fn numbered_links(links: &[Link], cap: usize) -> Vec<String> {
    links
        .iter()
        .take(cap)
        .enumerate()
        .map(|(i, link)| link_line(i + 1, link))
        .collect()
}

fn chunk_index(chunks: &[Chunk], cap: usize) -> Vec<String> {
    chunks
        .iter()
        .take(cap)
        .map(|c| {
            format!(
                "{} lvl={} tokens~{} {}",
                c.id,
                c.level,
                c.token_estimate,
                truncate_chars(&c.heading, HEADING_INDEX_CHARS)
            )
        })
        .collect()
}

/// First sentence-like fragment of each of the leading chunks
pub fn keypoints(chunks: &[Chunk]) -> Vec<String> {
    chunks
        .iter()
        .take(KEYPOINT_CHUNKS)
        .filter(|c| !c.text.is_empty())
        .filter_map(|c| {
            let sentence = c.text.split('.').next().unwrap_or_default();
            let fragment = truncate_chars(sentence, KEYPOINT_CHARS);
            if fragment.is_empty() {
                return None;
            }
            Some(format!("{}: {}.", c.heading, fragment.trim()))
        })
        .take(KEYPOINT_CAP)
        .collect()
}

pub fn snippets(chunks: &[Chunk]) -> Vec<String> {
    chunks
        .iter()
        .take(SNIPPET_CHUNKS)
        .filter(|c| !c.text.is_empty())
        .map(|c| format!("[{}] {}...", c.id, truncate_chars(&c.text, SNIPPET_CHARS).trim()))
        .collect()
}

fn entity_line(label: &str, values: &[String]) -> String {
    if values.is_empty() {
        format!("{}: (none)", label)
    } else {
        format!("{}: {}", label, values.join(", "))
    }
}

fn render_outline(page: &ExtractedPage, meta: Vec<String>) -> String {
    let outline = outline_lines(&page.chunks);
    join_sections(vec![
        meta,
        titled("OUTLINE", outline.into_iter().take(OUTLINE_FULL_CAP)),
        titled(
            "LINKS",
            or_placeholder(numbered_links(&page.page_links, LINKS_OUTLINE_CAP), "(none)"),
        ),
        titled("CHUNKS", chunk_index(&page.chunks, CHUNK_INDEX_OUTLINE_CAP)),
        titled("NEXT", [NEXT_OUTLINE.to_string()]),
    ])
}

fn render_focus(page: &ExtractedPage, meta: Vec<String>, idx: usize, chunk: &Chunk) -> String {
    let outline = outline_lines(&page.chunks);

    let mut chunk_lines = vec![
        "CHUNK".to_string(),
        format!("id: {}", chunk.id),
        format!("heading: {}", chunk.heading),
        format!("level: {}", chunk.level),
        format!("tokens_est: {}", chunk.token_estimate),
    ];
    if !chunk.text.is_empty() {
        chunk_lines.push(String::new());
        chunk_lines.push(truncate_chars(&chunk.text, FOCUS_TEXT_CHARS).to_string());
    }

    let previous = idx
        .checked_sub(1)
        .and_then(|i| page.chunks.get(i))
        .map_or("-", |c| c.id.as_str());
    let next = page.chunks.get(idx + 1).map_or("-", |c| c.id.as_str());

    // Numbering follows the full page link list
    let local_links: Vec<String> = page
        .page_links
        .iter()
        .enumerate()
        .filter(|(_, link)| !link.text.is_empty() && chunk.text.contains(link.text.as_str()))
        .take(LINKS_LOCAL_CAP)
        .map(|(i, link)| link_line(i + 1, link))
        .collect();

    join_sections(vec![
        meta,
        titled("OUTLINE", outline.into_iter().take(OUTLINE_FOCUS_CAP)),
        chunk_lines,
        vec![
            "NEIGHBORS".to_string(),
            format!("previous: {}", previous),
            format!("next: {}", next),
        ],
        titled("LINKS (local excerpt)", or_placeholder(local_links, "(none)")),
        titled("NEXT", [NEXT_FOCUS.to_string()]),
    ])
}

fn render_full(page: &ExtractedPage, meta: Vec<String>) -> String {
    let outline = outline_lines(&page.chunks);
    let entities = extract_entities(&page.full_text());
    let nav: Vec<String> = page
        .nav_links
        .iter()
        .take(NAV_CAP)
        .map(|n| format!("• {} — {}", n.text, n.url))
        .collect();

    join_sections(vec![
        meta,
        titled("OUTLINE", outline.into_iter().take(OUTLINE_FULL_CAP)),
        titled("KEYPOINTS", or_placeholder(keypoints(&page.chunks), "(none extracted)")),
        vec![
            "ENTITIES".to_string(),
            entity_line("names", &entities.names),
            entity_line("years", &entities.years),
            entity_line("numbers", &entities.numbers),
        ],
        titled(
            "LINKS",
            or_placeholder(numbered_links(&page.page_links, LINKS_FULL_CAP), "(none)"),
        ),
        titled("NAV", or_placeholder(nav, "(none)")),
        titled("SNIPPETS", or_placeholder(snippets(&page.chunks), "(none)")),
        titled("CHUNKS", chunk_index(&page.chunks, CHUNK_INDEX_FULL_CAP)),
        titled("NEXT", [NEXT_FULL.to_string()]),
    ])
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML structural extraction
//!
//! Decomposes a page into headings, heading-bounded chunks, page links and
//! navigation links. Everything is recomputed per call; chunk and link ids are
//! only meaningful against the exact HTML they were produced from.

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use super::text::{collapse, element_text, token_estimate, truncate_chars};
use super::types::{Chunk, ExtractedPage, Heading, Link};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3"];

/// Main content root candidates, in priority order
const MAIN_ROOT_SELECTORS: &[&str] = &["main", "article", "body"];

const MAX_PAGE_LINKS: usize = 200;
const MAX_NAV_LINKS: usize = 50;
const MAX_LINK_TEXT_CHARS: usize = 160;

/// Errors raised while traversing a parsed document
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Run the full extraction pass over an HTML body
///
/// # Arguments
/// * `html` - Raw HTML string
/// * `base_url` - URL the body was fetched from, used to resolve relative links
pub fn extract_page(html: &str, base_url: &str) -> Result<ExtractedPage, ExtractionError> {
    let document = Html::parse_document(html);
    let main = select_main(&document)?;

    let title = extract_title(&document)?;
    let meta_description = extract_meta_description(&document)?;
    let heading_elements = collect_headings(main)?;
    let chunks = build_chunks(&heading_elements, main);
    let headings = heading_elements.into_iter().map(|(heading, _)| heading).collect();
    let page_links = gather_links(main, base_url)?;
    let nav_links = extract_nav_links(&document, base_url)?;

    Ok(ExtractedPage {
        title,
        meta_description,
        headings,
        chunks,
        page_links,
        nav_links,
    })
}

/// Page links only, as used when resolving a link id against a base page
pub fn extract_page_links(html: &str, base_url: &str) -> Result<Vec<Link>, ExtractionError> {
    let document = Html::parse_document(html);
    let main = select_main(&document)?;
    gather_links(main, base_url)
}

/// Prefer `<main>`, then `<article>`, then `<body>`, else the document root
fn select_main(document: &Html) -> Result<ElementRef<'_>, ExtractionError> {
    for css in MAIN_ROOT_SELECTORS {
        if let Some(element) = document.select(&selector(css)?).next() {
            return Ok(element);
        }
    }
    Ok(document.root_element())
}

fn extract_title(document: &Html) -> Result<String, ExtractionError> {
    Ok(document
        .select(&selector("title")?)
        .next()
        .map(element_text)
        .unwrap_or_default())
}

fn extract_meta_description(document: &Html) -> Result<String, ExtractionError> {
    Ok(document
        .select(&selector("meta[name]")?)
        .find(|meta| meta.value().attr("name") == Some("description"))
        .and_then(|meta| meta.value().attr("content"))
        .map(collapse)
        .unwrap_or_default())
}

fn heading_level(element: &scraper::node::Element) -> Option<u8> {
    match element.name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        _ => None,
    }
}

/// h1-h3 inside the main root in document order; empty headings are dropped
fn collect_headings(main: ElementRef<'_>) -> Result<Vec<(Heading, ElementRef<'_>)>, ExtractionError> {
    let mut headings = Vec::new();
    for (anchor, element) in main.select(&selector("h1, h2, h3")?).enumerate() {
        let Some(level) = heading_level(element.value()) else {
            continue;
        };
        let title = element_text(element);
        if title.is_empty() {
            continue;
        }
        headings.push((
            Heading {
                level,
                title,
                anchor,
            },
            element,
        ));
    }
    Ok(headings)
}

/// Heading-bounded chunks
///
/// Each chunk gathers the heading's following siblings up to the next heading
/// of equal or shallower level. Any h1-h3 sibling, including a deeper one,
/// also ends the walk, so sub-headings cut their parent's text short.
fn build_chunks(headings: &[(Heading, ElementRef<'_>)], main: ElementRef<'_>) -> Vec<Chunk> {
    if headings.is_empty() {
        let text = element_text(main);
        return vec![Chunk {
            id: "sec-1".to_string(),
            heading: "Document".to_string(),
            level: 1,
            token_estimate: token_estimate(&text),
            text,
        }];
    }

    headings
        .iter()
        .enumerate()
        .map(|(idx, (heading, start))| {
            let stop = headings[idx + 1..]
                .iter()
                .find(|(next, _)| next.level <= heading.level)
                .map(|(_, element)| element.id());

            let mut texts = Vec::new();
            for sibling in start.next_siblings() {
                if Some(sibling.id()) == stop {
                    break;
                }
                match sibling.value() {
                    Node::Element(element) => {
                        if HEADING_TAGS.contains(&element.name()) {
                            break;
                        }
                        if let Some(child) = ElementRef::wrap(sibling) {
                            let text = element_text(child);
                            if !text.is_empty() {
                                texts.push(text);
                            }
                        }
                    }
                    Node::Text(text) => {
                        let text = collapse(text);
                        if !text.is_empty() {
                            texts.push(text);
                        }
                    }
                    _ => {}
                }
            }

            let text = texts.join(" \n").trim().to_string();
            Chunk {
                id: format!("sec-{}", idx + 1),
                heading: heading.title.clone(),
                level: heading.level,
                token_estimate: token_estimate(&text),
                text,
            }
        })
        .collect()
}

/// Resolve `href` against the page URL, falling back to the raw value
pub fn resolve_url(base_url: &str, href: &str) -> String {
    match Url::parse(base_url) {
        Ok(base) => base
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string()),
        Err(_) => Url::parse(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string()),
    }
}

fn anchor_link(anchor: ElementRef<'_>, base_url: &str, max_text_chars: Option<usize>) -> Option<Link> {
    let href = anchor.value().attr("href")?;
    if href.is_empty() {
        return None;
    }
    let url = resolve_url(base_url, href);
    let text = element_text(anchor);
    let text = match max_text_chars {
        Some(max) => truncate_chars(&text, max).to_string(),
        None => text,
    };
    if url.is_empty() || text.is_empty() {
        return None;
    }
    Some(Link { text, url })
}

fn dedupe_links(links: Vec<Link>, cap: usize) -> Vec<Link> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert((link.text.clone(), link.url.clone())))
        .take(cap)
        .collect()
}

fn gather_links(main: ElementRef<'_>, base_url: &str) -> Result<Vec<Link>, ExtractionError> {
    let links = main
        .select(&selector("a[href]")?)
        .filter_map(|a| anchor_link(a, base_url, Some(MAX_LINK_TEXT_CHARS)))
        .collect();
    Ok(dedupe_links(links, MAX_PAGE_LINKS))
}

fn extract_nav_links(document: &Html, base_url: &str) -> Result<Vec<Link>, ExtractionError> {
    let anchors = selector("a[href]")?;
    let mut links = Vec::new();
    for nav in document.select(&selector("nav")?) {
        links.extend(nav.select(&anchors).filter_map(|a| anchor_link(a, base_url, None)));
    }
    Ok(dedupe_links(links, MAX_NAV_LINKS))
}

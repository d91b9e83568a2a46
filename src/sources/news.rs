// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Latvian news headlines from Google News RSS

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::{client_with_timeout, get_body, SourceError};

const TOP_STORIES_URL: &str = "https://news.google.com/rss";
const SEARCH_URL: &str = "https://news.google.com/rss/search";
const LOCALE_PARAMS: [(&str, &str); 3] = [("hl", "lv"), ("gl", "LV"), ("ceid", "LV:lv")];

pub const DEFAULT_NEWS_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub published: String,
}

pub struct NewsClient {
    client: Client,
    top_url: String,
    search_url: String,
}

impl NewsClient {
    pub fn new() -> Self {
        Self::with_endpoints(TOP_STORIES_URL, SEARCH_URL)
    }

    /// Use other feed URLs (for testing)
    pub fn with_endpoints(top_url: &str, search_url: &str) -> Self {
        Self {
            client: client_with_timeout(Duration::from_secs(10)),
            top_url: top_url.to_string(),
            search_url: search_url.to_string(),
        }
    }

    /// Top stories feed, or the search feed when a query is given
    pub fn feed_url(&self, query: Option<&str>) -> Result<Url, SourceError> {
        let parsed = match query {
            Some(q) => {
                let mut params = vec![("q", q)];
                params.extend(LOCALE_PARAMS);
                Url::parse_with_params(&self.search_url, params)
            }
            None => Url::parse_with_params(&self.top_url, LOCALE_PARAMS),
        };
        parsed.map_err(|e| SourceError::Parse(e.to_string()))
    }

    pub async fn headlines(
        &self,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<NewsItem>, SourceError> {
        let url = self.feed_url(query)?;
        let body = get_body(self.client.get(url)).await?;
        parse_rss_items(&body, limit)
    }

    /// Tool payload: `{items, query, source}` or `{"error": ...}`
    pub async fn latvian_news(&self, query: Option<&str>, limit: usize) -> Value {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        match self.headlines(query, limit).await {
            Ok(items) => json!({
                "items": items,
                "query": query,
                "source": "Google News RSS",
            }),
            Err(e) => json!({ "error": format!("News fetch failed: {}", e) }),
        }
    }
}

impl Default for NewsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Bulleted text view of a news payload; falls back to the JSON when empty
pub fn format_news(payload: &Value, query: Option<&str>) -> String {
    let items = payload["items"].as_array().filter(|items| !items.is_empty());
    let Some(items) = items else {
        return payload.to_string();
    };

    let header = match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("Latvian News — {}:", q),
        None => "Latvian News:".to_string(),
    };
    let mut lines = vec![header];
    for item in items {
        let field = |name: &str| item[name].as_str().unwrap_or_default().trim().to_string();
        let mut line = format!("• {} — {}", field("title"), field("url"));
        let published = field("published");
        if !published.is_empty() {
            line.push_str(&format!(" (Published: {})", published));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// `<item>` entries with non-empty title and link, up to `limit`
pub fn parse_rss_items(body: &str, limit: usize) -> Result<Vec<NewsItem>, SourceError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut items = Vec::new();
    let mut current: Option<NewsItem> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    current = Some(NewsItem::default());
                } else if current.is_some() {
                    field = Some(name);
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map(|t| t.to_string()).unwrap_or_default();
                append_field(current.as_mut(), field.as_deref(), &text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c).to_string();
                append_field(current.as_mut(), field.as_deref(), &text);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    if let Some(item) = current.take() {
                        if !item.title.trim().is_empty() && !item.url.trim().is_empty() {
                            items.push(NewsItem {
                                title: item.title.trim().to_string(),
                                url: item.url.trim().to_string(),
                                published: item.published.trim().to_string(),
                            });
                        }
                    }
                    if items.len() >= limit {
                        break;
                    }
                }
                field = None;
            }
            Ok(_) => {}
            Err(e) => {
                return Err(SourceError::Parse(format!(
                    "RSS error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(items)
}

fn append_field(item: Option<&mut NewsItem>, field: Option<&str>, text: &str) {
    let (Some(item), Some(field)) = (item, field) else {
        return;
    };
    match field {
        "title" => item.title.push_str(text),
        "link" => item.url.push_str(text),
        "pubDate" => item.published.push_str(text),
        _ => {}
    }
}

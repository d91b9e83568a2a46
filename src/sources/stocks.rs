// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stock quotes via the unofficial Yahoo Finance quote endpoint

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;

use super::{client_with_timeout, get_body, SourceError};

const QUOTE_API: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const SOURCE_LABEL: &str = "Yahoo Finance (unofficial)";

/// One normalised quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockQuote {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub currency: Option<String>,
    pub previous_close: Option<f64>,
    pub day_range: Option<String>,
    pub market_state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: Option<QuoteResponse>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<RawQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    symbol: Option<String>,
    short_name: Option<String>,
    long_name: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_change_percent: Option<f64>,
    currency: Option<String>,
    regular_market_previous_close: Option<f64>,
    regular_market_day_range: Option<String>,
    market_state: Option<String>,
}

impl From<RawQuote> for StockQuote {
    fn from(raw: RawQuote) -> Self {
        Self {
            symbol: raw.symbol,
            name: raw.short_name.or(raw.long_name),
            price: raw.regular_market_price,
            change_percent: raw.regular_market_change_percent,
            currency: raw.currency,
            previous_close: raw.regular_market_previous_close,
            day_range: raw.regular_market_day_range,
            market_state: raw.market_state,
        }
    }
}

fn separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").expect("separator pattern compiles"))
}

/// Upper-cased symbols from a comma/whitespace separated string or a JSON list
pub fn parse_symbols(symbols: &Value) -> Vec<String> {
    match symbols {
        Value::String(raw) => separator()
            .split(raw.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .collect(),
        Value::Array(list) => list
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .collect(),
        _ => Vec::new(),
    }
}

pub struct StockClient {
    client: Client,
    api_url: String,
}

impl StockClient {
    pub fn new() -> Self {
        Self::with_endpoint(QUOTE_API)
    }

    /// Use a different quote endpoint (for testing)
    pub fn with_endpoint(api_url: &str) -> Self {
        Self {
            client: client_with_timeout(Duration::from_secs(8)),
            api_url: api_url.to_string(),
        }
    }

    pub async fn quotes(&self, symbols: &[String]) -> Result<Vec<StockQuote>, SourceError> {
        let joined = symbols.join(",");
        let body = get_body(
            self.client
                .get(&self.api_url)
                .query(&[("symbols", joined.as_str())]),
        )
        .await?;
        let envelope: QuoteEnvelope =
            serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(envelope
            .quote_response
            .map(|r| r.result.into_iter().map(StockQuote::from).collect())
            .unwrap_or_default())
    }

    /// Tool payload: `{quotes, requested, source}` or `{"error": ...}`
    pub async fn stock_quotes(&self, symbols: &Value) -> Value {
        let requested = parse_symbols(symbols);
        if requested.is_empty() {
            return json!({ "error": "No symbols provided" });
        }
        match self.quotes(&requested).await {
            Ok(quotes) => json!({
                "quotes": quotes,
                "requested": requested,
                "source": SOURCE_LABEL,
            }),
            Err(e) => json!({ "error": format!("Stock quote fetch failed: {}", e) }),
        }
    }
}

impl Default for StockClient {
    fn default() -> Self {
        Self::new()
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::FetchError;
use crate::models::date_range::{DateRange, DATE_FORMAT};
use crate::models::price::PriceHistory;
use super::traits::HistoryProvider;

const BASE_URL: &str = "https://api.worldtradingdata.com";
const HISTORY_PATH: &str = "/api/v1/history";
const PROVIDER_NAME: &str = "World Trading Data";

/// World Trading Data provider for multi-symbol daily history.
///
/// - **Requires**: API token (set via settings as "worldtradingdata").
/// - **One request** covers every symbol and the full date range.
/// - Requested newest-first; ordering is irrelevant since `PriceHistory`
///   sorts by date.
pub struct WorldTradingDataProvider {
    client: Client,
    api_token: String,
    base_url: String,
}

impl WorldTradingDataProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_base_url(api_token, BASE_URL)
    }

    /// Point the provider at a different host (mirror or local test server).
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_token: api_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Decode a `/history` response body into a `PriceHistory`.
    pub fn parse_history(body: &str) -> Result<PriceHistory, FetchError> {
        let resp: HistoryResponse = serde_json::from_str(body)?;

        let rows = match (resp.history, resp.message) {
            (Some(rows), _) => rows,
            (None, Some(message)) => {
                return Err(FetchError::Api {
                    provider: PROVIDER_NAME.into(),
                    message,
                })
            }
            (None, None) => {
                return Err(FetchError::Api {
                    provider: PROVIDER_NAME.into(),
                    message: "Response contains no history".into(),
                })
            }
        };

        let mut history = PriceHistory::new();
        for (date_str, quotes) in rows {
            let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .map_err(|e| FetchError::Decode(format!("Invalid date '{date_str}': {e}")))?;
            for (symbol, quote) in quotes {
                let close = quote.close.to_f64().ok_or_else(|| {
                    FetchError::Decode(format!("Invalid close for {symbol} on {date_str}"))
                })?;
                history.insert(date, &symbol, close);
            }
        }
        Ok(history)
    }
}

// ── World Trading Data response types ───────────────────────────────

#[derive(Deserialize)]
struct HistoryResponse {
    history: Option<HashMap<String, HashMap<String, DailyQuote>>>,
    #[serde(rename = "Message", alias = "message")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct DailyQuote {
    close: CloseValue,
}

/// The API sends prices as strings; numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum CloseValue {
    Number(f64),
    Text(String),
}

impl CloseValue {
    fn to_f64(&self) -> Option<f64> {
        match self {
            CloseValue::Number(n) => Some(*n),
            CloseValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HistoryProvider for WorldTradingDataProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_history(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceHistory, FetchError> {
        let symbol_list = symbols
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}{}", self.base_url, HISTORY_PATH);

        debug!(symbols = %symbol_list, %range, "requesting history");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol_list.as_str()),
                ("date_from", range.from_param().as_str()),
                ("date_to", range.to_param().as_str()),
                ("sort", "newest"),
                ("api_token", self.api_token.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FetchError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status}"),
            });
        }

        let mut history = Self::parse_history(&body)?;
        let dropped = history.retain_range(range);
        info!(
            provider = PROVIDER_NAME,
            dates = history.len(),
            dropped,
            "fetched history"
        );
        Ok(history)
    }
}

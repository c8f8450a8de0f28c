use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;
use tracing::debug;

use crate::errors::FetchError;
use crate::models::date_range::DateRange;
use crate::models::price::{PriceHistory, PricePoint};
use super::traits::HistoryProvider;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider for daily equity history.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
/// - One request per symbol; the per-symbol series are merged into a
///   single `PriceHistory`.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, FetchError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| FetchError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, FetchError> {
        let invalid = |e: &dyn std::fmt::Display| FetchError::Decode(format!("Invalid date {date}: {e}"));

        let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(&e))?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| invalid(&e))?
            .with_hms(0, 0, 0)
            .map_err(|e| invalid(&e))?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let start = Self::to_offset_datetime(range.from)?;
        // inclusive end
        let end = Self::to_offset_datetime(range.to + chrono::Duration::days(1))?;

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| FetchError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| FetchError::Decode(format!(
            "Failed to parse quotes for {symbol}: {e}"
        )))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                range.contains(date).then_some(PricePoint {
                    date,
                    price: q.close,
                })
            })
            .collect())
    }
}

#[async_trait]
impl HistoryProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_history(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceHistory, FetchError> {
        let mut history = PriceHistory::new();
        for symbol in symbols {
            let symbol = symbol.to_uppercase();
            let points = self.fetch_symbol(&symbol, range).await?;
            debug!(%symbol, points = points.len(), "fetched yahoo quotes");
            history.insert_points(&symbol, &points);
        }
        Ok(history)
    }
}

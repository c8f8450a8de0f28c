use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::date_range::DateRange;
use crate::models::price::PriceHistory;

/// Trait abstraction for historical price sources.
///
/// Each API provider implements this trait. If an API stops working or
/// changes, only that one implementation is replaced.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch daily closes for every symbol over `range` (inclusive).
    ///
    /// Returned history may contain dates where some symbols have no close;
    /// the valuation engine reports those.
    async fn fetch_history(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceHistory, FetchError>;
}

use tracing::{info, warn};

use crate::errors::FetchError;
use crate::models::date_range::DateRange;
use crate::models::price::PriceHistory;
use crate::providers::registry::PriceProviderRegistry;

/// Fetches price history from the registered providers with fallback.
pub struct HistoryService {
    registry: PriceProviderRegistry,
}

impl HistoryService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of the configured providers, in the order they are tried.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Fetch history for `symbols` over `range`.
    ///
    /// Tries providers in registration order. If one fails (API down, bad
    /// token, rate limited), the next one is tried; the last error is
    /// returned when all of them fail.
    pub async fn fetch(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceHistory, FetchError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(FetchError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.fetch_history(symbols, range).await {
                Ok(history) => {
                    info!(
                        provider = provider.name(),
                        dates = history.len(),
                        entries = history.total_entries(),
                        "price history ready"
                    );
                    return Ok(history);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::NoProvider))
    }
}

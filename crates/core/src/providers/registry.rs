use tracing::debug;

use crate::models::settings::{Settings, WORLD_TRADING_DATA_KEY};

use super::traits::HistoryProvider;
use super::worldtradingdata::WorldTradingDataProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered list of history providers.
///
/// Registration order is priority order: the history service tries the
/// first provider and falls back to the next on failure.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn HistoryProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // World Trading Data: multi-symbol history, requires API token (primary)
        if let Some(token) = settings.api_key(WORLD_TRADING_DATA_KEY) {
            let provider = match &settings.provider_base_url {
                Some(url) => WorldTradingDataProvider::with_base_url(token, url),
                None => WorldTradingDataProvider::new(token),
            };
            registry.register(Box::new(provider));
        }

        // Yahoo Finance: NO API key needed (fallback)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(yahoo) = YahooFinanceProvider::new() {
                registry.register(Box::new(yahoo));
            }
        }

        debug!(providers = ?registry.provider_names(), "price provider registry built");
        registry
    }

    /// Register a new provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn HistoryProvider>) {
        self.providers.push(provider);
    }

    /// All providers, in priority order.
    pub fn providers(&self) -> Vec<&dyn HistoryProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

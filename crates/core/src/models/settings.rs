use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::chart::ChartStyle;

/// Key under which the World Trading Data token is stored in `api_keys`.
pub const WORLD_TRADING_DATA_KEY: &str = "worldtradingdata";

/// Runtime configuration for the calculator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "worldtradingdata").
    /// Values: the API key string.
    pub api_keys: HashMap<String, String>,

    /// Override for the World Trading Data base URL (mirrors, tests).
    pub provider_base_url: Option<String>,

    /// Styling of the value line in the chart payload.
    pub chart_style: ChartStyle,
}

impl Settings {
    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.into(), key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.provider_base_url = Some(url.into());
        self
    }

    /// API key for `provider`, ignoring blank values.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys
            .get(provider)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }
}

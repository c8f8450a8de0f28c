pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod state;

use chrono::NaiveDate;
use models::{
    allocation::{InputFields, ValidatedInput},
    calculation::Calculation,
    price::PriceHistory,
    series::PortfolioValueSeries,
    settings::Settings,
};
use providers::registry::PriceProviderRegistry;
use services::{
    chart_service::ChartService, history_service::HistoryService,
    validation_service::ValidationService, valuation_service::ValuationService,
};
use tracing::info;

use errors::CoreError;

/// Main entry point for the allocation backtest core library.
///
/// One `calculate` call is one submit: validate, fetch once, value, project.
/// The calculator holds no mutable state, so overlapping calls are
/// independent of each other.
#[must_use]
pub struct PortfolioCalculator {
    validation_service: ValidationService,
    history_service: HistoryService,
    valuation_service: ValuationService,
    chart_service: ChartService,
}

impl std::fmt::Debug for PortfolioCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioCalculator")
            .field("providers", &self.history_service.provider_names())
            .field("chart_style", self.chart_service.style())
            .finish()
    }
}

impl PortfolioCalculator {
    /// Create a calculator with the default providers for `settings`.
    pub fn new(settings: &Settings) -> Self {
        Self::with_registry(settings, PriceProviderRegistry::new_with_defaults(settings))
    }

    /// Create a calculator with an explicit provider registry.
    pub fn with_registry(settings: &Settings, registry: PriceProviderRegistry) -> Self {
        Self {
            validation_service: ValidationService::new(),
            history_service: HistoryService::new(registry),
            valuation_service: ValuationService::new(),
            chart_service: ChartService::with_style(settings.chart_style.clone()),
        }
    }

    /// Run one calculation using the local calendar date as "today".
    pub async fn calculate(&self, fields: &InputFields) -> Result<Calculation, CoreError> {
        self.calculate_as_of(fields, chrono::Local::now().date_naive())
            .await
    }

    /// Run one calculation with an explicit "today".
    ///
    /// Validation failures return before any provider is contacted.
    pub async fn calculate_as_of(
        &self,
        fields: &InputFields,
        today: NaiveDate,
    ) -> Result<Calculation, CoreError> {
        let input = self.validate(fields, today)?;
        let range = input.date_range(today);
        let symbols = input.symbols();

        info!(%range, symbols = ?symbols, balance = input.initial_balance, "calculating portfolio");
        let history = self.history_service.fetch(&symbols, &range).await?;

        let series = self.compute_series(&history, &input)?;
        let chart = self.chart_service.build_payload(&series);

        Ok(Calculation {
            input,
            range,
            series,
            chart,
        })
    }

    // ── Building blocks ─────────────────────────────────────────────

    /// Validate form input without fetching anything.
    pub fn validate(
        &self,
        fields: &InputFields,
        today: NaiveDate,
    ) -> Result<ValidatedInput, CoreError> {
        Ok(self.validation_service.validate(fields, today)?)
    }

    /// Value an already-fetched history for a validated input.
    pub fn compute_series(
        &self,
        history: &PriceHistory,
        input: &ValidatedInput,
    ) -> Result<PortfolioValueSeries, CoreError> {
        Ok(self.valuation_service.compute_series(
            history,
            input.initial_balance,
            &input.allocations,
        )?)
    }

    /// Names of the configured providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.history_service.provider_names()
    }

    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.history_service.has_provider()
    }
}

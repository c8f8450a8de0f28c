use tracing::debug;

use crate::errors::ValuationError;
use crate::models::allocation::AllocationFractions;
use crate::models::price::PriceHistory;
use crate::models::series::{PortfolioValuePoint, PortfolioValueSeries};

/// Turns a price history into a weighted portfolio value series.
///
/// For each date, the value is
/// `Σ close(date, symbol) × initial_balance × fraction(symbol)`
/// over every allocated symbol. Dates come out ascending because
/// `PriceHistory` stores them ordered.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Compute the value series.
    ///
    /// The whole history is scanned for non-finite or negative closes first,
    /// so a bad price is reported even when another symbol is also missing.
    /// An empty history yields an empty series.
    pub fn compute_series(
        &self,
        history: &PriceHistory,
        initial_balance: f64,
        fractions: &AllocationFractions,
    ) -> Result<PortfolioValueSeries, ValuationError> {
        Self::check_prices(history)?;

        let mut points = Vec::with_capacity(history.len());
        for (date, row) in history.iter() {
            let mut value = 0.0;
            for (symbol, fraction) in fractions.iter() {
                let close = row.get(symbol).copied().ok_or_else(|| {
                    ValuationError::MissingPriceData {
                        date,
                        symbol: symbol.to_string(),
                    }
                })?;
                value += close * initial_balance * fraction;
            }
            points.push(PortfolioValuePoint { date, value });
        }

        debug!(
            dates = points.len(),
            symbols = fractions.len(),
            "computed portfolio value series"
        );
        Ok(PortfolioValueSeries::new(points))
    }

    fn check_prices(history: &PriceHistory) -> Result<(), ValuationError> {
        for (date, row) in history.iter() {
            // Sorted so the reported symbol does not depend on hash order.
            let mut symbols: Vec<&String> = row.keys().collect();
            symbols.sort();
            for symbol in symbols {
                let price = row[symbol];
                if !price.is_finite() || price < 0.0 {
                    return Err(ValuationError::InvalidPriceData {
                        date,
                        symbol: symbol.clone(),
                        price,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};

use super::allocation::ValidatedInput;
use super::chart::ChartPayload;
use super::date_range::DateRange;
use super::series::PortfolioValueSeries;

/// Everything produced by one successful submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub input: ValidatedInput,
    pub range: DateRange,
    pub series: PortfolioValueSeries,
    pub chart: ChartPayload,
}

impl Calculation {
    /// Chart rendering is suppressed for an empty series.
    pub fn has_chart(&self) -> bool {
        !self.series.is_empty()
    }

    /// Latest value in the series, if any.
    pub fn final_value(&self) -> Option<f64> {
        self.series.last().map(|p| p.value)
    }
}

use crate::models::chart::{ChartDataset, ChartPayload, ChartStyle};
use crate::models::date_range::DATE_FORMAT;
use crate::models::series::PortfolioValueSeries;

/// Projects a value series into the chart payload.
///
/// Pure mapping: labels are the series dates, a single dataset carries the
/// values. No error states.
pub struct ChartService {
    style: ChartStyle,
}

impl ChartService {
    pub fn new() -> Self {
        Self::with_style(ChartStyle::default())
    }

    pub fn with_style(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn build_payload(&self, series: &PortfolioValueSeries) -> ChartPayload {
        let labels = series
            .points()
            .iter()
            .map(|p| p.date.format(DATE_FORMAT).to_string())
            .collect();

        ChartPayload {
            labels,
            datasets: vec![ChartDataset {
                label: self.style.label.clone(),
                data: series.values(),
                fill: self.style.fill,
                border_color: self.style.border_color.clone(),
            }],
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

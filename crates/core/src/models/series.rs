use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Total portfolio value on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-date portfolio values, ascending by date.
///
/// Fully derived from the price history, balance and allocation; never
/// mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioValueSeries {
    points: Vec<PortfolioValuePoint>,
}

impl PortfolioValueSeries {
    pub fn new(points: Vec<PortfolioValuePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PortfolioValuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PortfolioValuePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PortfolioValuePoint> {
        self.points.last()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

impl IntoIterator for PortfolioValueSeries {
    type Item = PortfolioValuePoint;
    type IntoIter = std::vec::IntoIter<PortfolioValuePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::date_range::DateRange;

/// A single price data point (date → close) for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Historical daily closes: date → (symbol → close).
///
/// Dates are kept in a `BTreeMap`, so iteration is always ascending no
/// matter which order the provider returned them in. Symbols are
/// upper-cased on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    closes: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the close for `(date, symbol)`.
    pub fn insert(&mut self, date: NaiveDate, symbol: &str, close: f64) {
        self.closes
            .entry(date)
            .or_default()
            .insert(symbol.to_uppercase(), close);
    }

    /// Builder-style `insert`, handy when assembling fixtures.
    pub fn with_close(mut self, date: NaiveDate, symbol: &str, close: f64) -> Self {
        self.insert(date, symbol, close);
        self
    }

    /// Merge a per-symbol series (e.g. from a single-ticker API) into the table.
    pub fn insert_points(&mut self, symbol: &str, points: &[PricePoint]) {
        for point in points {
            self.insert(point.date, symbol, point.price);
        }
    }

    pub fn get(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        self.closes
            .get(&date)
            .and_then(|row| row.get(&symbol.to_uppercase()))
            .copied()
    }

    /// Dates present, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.closes.keys().copied().collect()
    }

    /// Rows in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &HashMap<String, f64>)> {
        self.closes.iter().map(|(d, row)| (*d, row))
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Total number of (date, symbol) closes.
    pub fn total_entries(&self) -> usize {
        self.closes.values().map(|row| row.len()).sum()
    }

    /// Drop every date outside `range`. Returns the number of dates removed.
    pub fn retain_range(&mut self, range: &DateRange) -> usize {
        let before = self.closes.len();
        self.closes.retain(|date, _| range.contains(*date));
        before - self.closes.len()
    }
}

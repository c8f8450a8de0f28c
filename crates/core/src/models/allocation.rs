use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::date_range::DateRange;

/// Tolerance applied when checking that allocation percentages add up to 100.
pub const ALLOCATION_SUM_EPSILON: f64 = 1e-9;

/// One allocation input as typed by the user: a symbol and raw percentage text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationField {
    pub symbol: String,
    pub percentage: String,
}

impl AllocationField {
    pub fn new(symbol: impl Into<String>, percentage: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            percentage: percentage.into(),
        }
    }
}

/// Raw, unvalidated form contents.
///
/// The declared asset set is exactly `allocations`: a declared asset whose
/// percentage is blank is a missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFields {
    /// Expected as `YYYY-MM-DD`
    pub start_date: String,

    /// Initial cash balance
    pub initial_balance: String,

    /// Declared assets with their percentage text, in display order
    pub allocations: Vec<AllocationField>,
}

impl InputFields {
    pub fn new(start_date: impl Into<String>, initial_balance: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            initial_balance: initial_balance.into(),
            allocations: Vec::new(),
        }
    }

    /// Builder-style helper for declaring an asset and its percentage.
    pub fn with_allocation(
        mut self,
        symbol: impl Into<String>,
        percentage: impl Into<String>,
    ) -> Self {
        self.allocations.push(AllocationField::new(symbol, percentage));
        self
    }
}

/// Symbol → percentage (0–100). Symbols are stored upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationSpec {
    percentages: BTreeMap<String, f64>,
}

impl AllocationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a percentage, returning the previous value for this symbol if any.
    pub fn insert(&mut self, symbol: &str, percentage: f64) -> Option<f64> {
        self.percentages.insert(symbol.to_uppercase(), percentage)
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.percentages.get(&symbol.to_uppercase()).copied()
    }

    pub fn total(&self) -> f64 {
        self.percentages.values().sum()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total() - 100.0).abs() <= ALLOCATION_SUM_EPSILON
    }

    pub fn len(&self) -> usize {
        self.percentages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.percentages.iter().map(|(s, p)| (s.as_str(), *p))
    }

    /// Convert percentages to 0–1 fractions.
    pub fn to_fractions(&self) -> AllocationFractions {
        AllocationFractions {
            fractions: self
                .percentages
                .iter()
                .map(|(symbol, pct)| (symbol.clone(), pct / 100.0))
                .collect(),
        }
    }
}

/// Symbol → fraction of the initial balance (0–1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationFractions {
    fractions: BTreeMap<String, f64>,
}

impl AllocationFractions {
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.fractions.get(&symbol.to_uppercase()).copied()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.fractions.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fractions.iter().map(|(s, f)| (s.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for AllocationFractions {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            fractions: iter
                .into_iter()
                .map(|(s, f)| (s.into().to_uppercase(), f))
                .collect(),
        }
    }
}

/// Normalized input, produced only by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedInput {
    pub start_date: NaiveDate,
    pub initial_balance: f64,
    pub allocations: AllocationFractions,
}

impl ValidatedInput {
    pub fn symbols(&self) -> Vec<String> {
        self.allocations.symbols()
    }

    /// Range to request from the price provider, ending on `today`.
    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        DateRange::new(self.start_date, today)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used on the provider wire and in chart labels.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar range requested from a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range; the ends are swapped if given in reverse order.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn from_param(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.from_param(), self.to_param())
    }
}

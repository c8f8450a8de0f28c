use chrono::NaiveDate;
use std::collections::HashSet;

use crate::errors::ValidationError;
use crate::models::allocation::{AllocationSpec, InputFields, ValidatedInput};
use crate::models::date_range::DATE_FORMAT;

/// Checks raw form input before any network call is made.
///
/// Stateless: the same fields and `today` always give the same answer.
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Validate against the local calendar date.
    pub fn validate_now(&self, fields: &InputFields) -> Result<ValidatedInput, ValidationError> {
        self.validate(fields, chrono::Local::now().date_naive())
    }

    /// Validate `fields`, treating `today` as the latest admissible start date.
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// completeness, number parsing, date parsing, duplicates, balance sign,
    /// percentage range, percentage sum, start date.
    pub fn validate(
        &self,
        fields: &InputFields,
        today: NaiveDate,
    ) -> Result<ValidatedInput, ValidationError> {
        self.check_complete(fields)?;

        let initial_balance = parse_number("initial balance", &fields.initial_balance)?;
        let mut parsed = Vec::with_capacity(fields.allocations.len());
        for field in &fields.allocations {
            let symbol = field.symbol.trim().to_uppercase();
            let percentage =
                parse_number(&format!("allocation {symbol}"), &field.percentage)?;
            parsed.push((symbol, percentage));
        }

        let start_date = NaiveDate::parse_from_str(fields.start_date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(fields.start_date.trim().to_string()))?;

        let mut seen = HashSet::new();
        for (symbol, _) in &parsed {
            if !seen.insert(symbol.as_str()) {
                return Err(ValidationError::DuplicateSymbol(symbol.clone()));
            }
        }

        if initial_balance <= 0.0 {
            return Err(ValidationError::NonPositiveBalance(initial_balance));
        }

        let mut spec = AllocationSpec::new();
        for (symbol, percentage) in parsed {
            if !(0.0..=100.0).contains(&percentage) {
                return Err(ValidationError::AllocationOutOfRange { symbol, percentage });
            }
            spec.insert(&symbol, percentage);
        }

        if !spec.is_balanced() {
            return Err(ValidationError::AllocationSumMismatch(spec.total()));
        }

        if start_date > today {
            return Err(ValidationError::FutureStartDate(start_date));
        }

        Ok(ValidatedInput {
            start_date,
            initial_balance,
            allocations: spec.to_fractions(),
        })
    }

    fn check_complete(&self, fields: &InputFields) -> Result<(), ValidationError> {
        if fields.start_date.trim().is_empty() {
            return Err(ValidationError::MissingField("start date".into()));
        }
        if fields.initial_balance.trim().is_empty() {
            return Err(ValidationError::MissingField("initial balance".into()));
        }
        if fields.allocations.is_empty() {
            return Err(ValidationError::MissingField("allocations".into()));
        }
        for field in &fields.allocations {
            let symbol = field.symbol.trim();
            if symbol.is_empty() {
                return Err(ValidationError::MissingField("asset symbol".into()));
            }
            if field.percentage.trim().is_empty() {
                return Err(ValidationError::MissingField(format!(
                    "allocation {}",
                    symbol.to_uppercase()
                )));
            }
        }
        Ok(())
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a finite `f64`; NaN and infinities are rejected like any other garbage.
fn parse_number(field: &str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field: field.to_string(),
            value: raw.trim().to_string(),
        })
}

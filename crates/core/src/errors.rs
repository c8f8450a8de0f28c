use chrono::NaiveDate;
use thiserror::Error;

/// Message shown for every transport-level failure. The detailed cause is
/// logged, never displayed.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data from the API. Please try again later.";

/// Unified error type for the entire allocation-backtest-core library.
/// Every public function on the calculator returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Valuation(#[from] ValuationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CoreError {
    /// Stable key identifying the failure kind (for UI lookup tables / logs).
    pub fn tag(&self) -> &'static str {
        match self {
            CoreError::Validation(e) => e.tag(),
            CoreError::Valuation(e) => e.tag(),
            CoreError::Fetch(e) => e.tag(),
        }
    }

    /// Single-line message for the error display.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Fetch(_) => FETCH_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

// ── Input validation ────────────────────────────────────────────────

/// Rejected user input. Raised before any network activity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please fill in all the fields (missing: {0}).")]
    MissingField(String),

    #[error("{field} must be a number, got '{value}'.")]
    InvalidNumber { field: String, value: String },

    #[error("Start date '{0}' is not a valid date (expected YYYY-MM-DD).")]
    InvalidDate(String),

    #[error("Asset {0} is listed more than once.")]
    DuplicateSymbol(String),

    #[error("Initial balance must be positive, got {0}.")]
    NonPositiveBalance(f64),

    #[error("Allocation for {symbol} must be between 0 and 100, got {percentage}.")]
    AllocationOutOfRange { symbol: String, percentage: f64 },

    #[error("Allocation percentages must sum up to 100 (got {0}).")]
    AllocationSumMismatch(f64),

    #[error("Start date cannot be in the future ({0}).")]
    FutureStartDate(NaiveDate),
}

impl ValidationError {
    pub fn tag(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "MissingField",
            ValidationError::InvalidNumber { .. } => "InvalidNumber",
            ValidationError::InvalidDate(_) => "InvalidDate",
            ValidationError::DuplicateSymbol(_) => "DuplicateSymbol",
            ValidationError::NonPositiveBalance(_) => "NonPositiveBalance",
            ValidationError::AllocationOutOfRange { .. } => "AllocationOutOfRange",
            ValidationError::AllocationSumMismatch(_) => "AllocationSumMismatch",
            ValidationError::FutureStartDate(_) => "FutureStartDate",
        }
    }
}

// ── Valuation ───────────────────────────────────────────────────────

/// The price history handed to the engine cannot produce a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("Price data missing for {symbol} on {date}")]
    MissingPriceData { date: NaiveDate, symbol: String },

    #[error("Invalid price {price} for {symbol} on {date}")]
    InvalidPriceData {
        date: NaiveDate,
        symbol: String,
        price: f64,
    },
}

impl ValuationError {
    pub fn tag(&self) -> &'static str {
        match self {
            ValuationError::MissingPriceData { .. } => "MissingPriceData",
            ValuationError::InvalidPriceData { .. } => "InvalidPriceData",
        }
    }
}

// ── API / Network ───────────────────────────────────────────────────

/// Transport-level failure while fetching price history.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    Decode(String),

    #[error("No price history provider configured")]
    NoProvider,
}

impl FetchError {
    pub fn tag(&self) -> &'static str {
        match self {
            FetchError::Api { .. } => "Api",
            FetchError::Network(_) => "Network",
            FetchError::Decode(_) => "Decode",
            FetchError::NoProvider => "NoProvider",
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // The provider token travels in the query string; reqwest errors
        // carry the full URL, so strip everything after '?'.
        FetchError::Network(redact_query(&e.to_string()))
    }
}

pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}

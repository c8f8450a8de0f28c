pub mod chart_service;
pub mod history_service;
pub mod valuation_service;
pub mod validation_service;

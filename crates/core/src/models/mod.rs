pub mod allocation;
pub mod calculation;
pub mod chart;
pub mod date_range;
pub mod price;
pub mod series;
pub mod settings;

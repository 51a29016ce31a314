//! Domain services

pub mod economy;
pub mod locations;
pub mod summary;

pub use economy::{
    average_economy, cost_per_distance, distance_span, economy_series, fuel_economy,
    odometer_range, price_series, sort_ascending, sort_descending, total_spend, TrendPoint,
};
pub use locations::{location_history, LocationVisit};
pub use summary::LogSummary;

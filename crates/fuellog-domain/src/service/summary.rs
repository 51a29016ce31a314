//! Summary statistics for a whole fuel log

use serde::{Deserialize, Serialize};

use fuellog_types::FuelLogRecord;

use super::economy::{
    cost_per_distance, distance_span, economy_series, sort_ascending, total_spend,
};

/// Headline numbers for the statistics view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub entry_count: usize,
    pub total_spend: f64,
    pub total_volume: f64,
    pub average_economy: Option<f64>,
    pub best_economy: Option<f64>,
    pub worst_economy: Option<f64>,
    pub distance_span: Option<f64>,
    pub cost_per_distance: Option<f64>,
    pub average_unit_price: Option<f64>,
    /// Odometer of the most recent fill-up
    pub latest_odometer: Option<f64>,
}

impl LogSummary {
    /// Summarize records given in any order
    pub fn from_records(records: &[FuelLogRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let sorted = sort_ascending(records);
        let economies: Vec<f64> = economy_series(&sorted).iter().map(|p| p.value).collect();

        let average_economy = if economies.is_empty() {
            None
        } else {
            Some(economies.iter().sum::<f64>() / economies.len() as f64)
        };
        let best_economy = economies.iter().cloned().reduce(f64::max);
        let worst_economy = economies.iter().cloned().reduce(f64::min);

        let n = sorted.len() as f64;
        let average_unit_price = Some(sorted.iter().map(|r| r.unit_price).sum::<f64>() / n);

        Self {
            entry_count: sorted.len(),
            total_spend: total_spend(&sorted),
            total_volume: sorted.iter().map(|r| r.volume).sum(),
            average_economy,
            best_economy,
            worst_economy,
            distance_span: distance_span(&sorted),
            cost_per_distance: cost_per_distance(&sorted),
            average_unit_price,
            latest_odometer: sorted.last().map(|r| r.odometer),
        }
    }
}

//! Query Service - read-only views over the log

use fuellog_domain::repository::LogStorage;
use fuellog_domain::service::{
    economy_series, fuel_economy, location_history, price_series, LocationVisit, TrendPoint,
};
use fuellog_store::LogBook;
use fuellog_types::FuelLogRecord;
use serde::{Deserialize, Serialize};

/// A record as listed, with its economy against the previous fill-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    #[serde(flatten)]
    pub record: FuelLogRecord,
    pub economy: Option<f64>,
}

/// Series for the trends view, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub economy: Vec<TrendPoint>,
    pub price: Vec<TrendPoint>,
}

/// Newest first; `limit` keeps only the most recent rows
pub fn log_rows<S: LogStorage>(book: &LogBook<S>, limit: Option<usize>) -> Vec<LogRow> {
    let sorted = book.oldest_first();
    let mut rows: Vec<LogRow> = sorted
        .iter()
        .enumerate()
        .map(|(i, record)| LogRow {
            record: record.clone(),
            economy: i
                .checked_sub(1)
                .and_then(|prev| fuel_economy(record, &sorted[prev])),
        })
        .collect();
    rows.reverse();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

pub fn trend_report<S: LogStorage>(book: &LogBook<S>) -> TrendReport {
    let sorted = book.oldest_first();
    TrendReport {
        economy: economy_series(&sorted),
        price: price_series(&sorted),
    }
}

pub fn locations<S: LogStorage>(book: &LogBook<S>) -> Vec<LocationVisit> {
    location_history(book.records())
}

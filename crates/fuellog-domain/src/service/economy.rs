//! Fuel economy and cost derivations over fill-up history
//!
//! Everything here is a pure function of its inputs. Undefined values
//! (no distance travelled, odometer rollback, empty history) come back as
//! `None` so a display loop can render a placeholder and keep going.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fuellog_types::FuelLogRecord;

/// One point of a display series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Distance per unit volume for `current`, measured from `previous`.
///
/// The volume bought at `current` is taken to cover the whole distance since
/// `previous`. Only odometers are compared; timestamps are the caller's
/// concern.
pub fn fuel_economy(current: &FuelLogRecord, previous: &FuelLogRecord) -> Option<f64> {
    if current.odometer <= previous.odometer || current.volume <= 0.0 {
        return None;
    }
    let economy = (current.odometer - previous.odometer) / current.volume;
    economy.is_finite().then_some(economy)
}

/// Copy sorted oldest first
pub fn sort_ascending(records: &[FuelLogRecord]) -> Vec<FuelLogRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    sorted
}

/// Copy sorted newest first
pub fn sort_descending(records: &[FuelLogRecord]) -> Vec<FuelLogRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

/// Economy of every record that has a usable predecessor.
///
/// `sorted` must be oldest first.
pub fn economy_series(sorted: &[FuelLogRecord]) -> Vec<TrendPoint> {
    sorted
        .windows(2)
        .filter_map(|pair| {
            fuel_economy(&pair[1], &pair[0]).map(|value| TrendPoint {
                timestamp: pair[1].timestamp,
                value,
            })
        })
        .collect()
}

/// Unit price of every record, in the order given
pub fn price_series(sorted: &[FuelLogRecord]) -> Vec<TrendPoint> {
    sorted
        .iter()
        .map(|r| TrendPoint {
            timestamp: r.timestamp,
            value: r.unit_price,
        })
        .collect()
}

/// Mean of all defined pairwise economies. `sorted` must be oldest first.
pub fn average_economy(sorted: &[FuelLogRecord]) -> Option<f64> {
    let series = economy_series(sorted);
    if series.is_empty() {
        return None;
    }
    let sum: f64 = series.iter().map(|p| p.value).sum();
    Some(sum / series.len() as f64)
}

/// Sum of everything paid, independent of order
pub fn total_spend(records: &[FuelLogRecord]) -> f64 {
    records.iter().map(|r| r.total_cost).sum()
}

/// Lowest and highest odometer reading
pub fn odometer_range(records: &[FuelLogRecord]) -> Option<(f64, f64)> {
    let first = records.first()?.odometer;
    Some(records.iter().fold((first, first), |(min, max), r| {
        (min.min(r.odometer), max.max(r.odometer))
    }))
}

/// Distance covered between the lowest and highest odometer reading
pub fn distance_span(records: &[FuelLogRecord]) -> Option<f64> {
    let (min, max) = odometer_range(records)?;
    let span = max - min;
    (span > 0.0).then_some(span)
}

/// Total spend divided by the odometer span of the whole history
pub fn cost_per_distance(records: &[FuelLogRecord]) -> Option<f64> {
    let span = distance_span(records)?;
    Some(total_spend(records) / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(day: i64, odometer: f64, volume: f64, total_cost: f64) -> FuelLogRecord {
        FuelLogRecord {
            id: format!("r{}", day),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::days(day),
            odometer,
            volume,
            unit_price: 3.0,
            total_cost,
            location: None,
            latitude: None,
            longitude: None,
            weather_temperature: None,
            weather_code: None,
        }
    }

    #[test]
    fn test_fuel_economy_uses_current_volume() {
        let previous = record(0, 10000.0, 8.0, 24.0);
        let current = record(7, 10300.0, 10.0, 30.0);
        assert_eq!(fuel_economy(&current, &previous), Some(30.0));
    }

    #[test]
    fn test_fuel_economy_undefined_without_distance() {
        let previous = record(0, 10300.0, 8.0, 24.0);
        let same = record(1, 10300.0, 10.0, 30.0);
        let rolled_back = record(2, 10100.0, 10.0, 30.0);
        assert_eq!(fuel_economy(&same, &previous), None);
        assert_eq!(fuel_economy(&rolled_back, &previous), None);
    }

    #[test]
    fn test_fuel_economy_undefined_for_zero_volume() {
        let previous = record(0, 10000.0, 8.0, 24.0);
        let current = record(1, 10300.0, 0.0, 0.0);
        assert_eq!(fuel_economy(&current, &previous), None);
    }

    #[test]
    fn test_fuel_economy_ignores_timestamps() {
        let later = record(10, 10000.0, 8.0, 24.0);
        let earlier = record(0, 10250.0, 5.0, 15.0);
        assert_eq!(fuel_economy(&earlier, &later), Some(50.0));
    }

    #[test]
    fn test_average_economy_scenario() {
        let sorted = vec![
            record(0, 10000.0, 9.0, 27.0),
            record(7, 10300.0, 10.0, 30.0),
            record(14, 10620.0, 11.0, 33.0),
        ];
        let avg = average_economy(&sorted).unwrap();
        let expected = (30.0 + 320.0 / 11.0) / 2.0;
        assert!((avg - expected).abs() < 1e-9);
        assert!((avg - 29.545).abs() < 1e-3);
    }

    #[test]
    fn test_average_economy_skips_undefined_pairs() {
        let sorted = vec![
            record(0, 10000.0, 9.0, 27.0),
            record(1, 10000.0, 9.0, 27.0),
            record(2, 10200.0, 10.0, 30.0),
        ];
        assert_eq!(average_economy(&sorted), Some(20.0));
        assert_eq!(average_economy(&sorted[..1]), None);
        assert_eq!(average_economy(&[]), None);
    }

    #[test]
    fn test_cost_per_distance() {
        let records = vec![
            record(0, 10000.0, 9.0, 50.0),
            record(7, 10300.0, 10.0, 45.0),
            record(14, 10620.0, 11.0, 55.0),
        ];
        let cpd = cost_per_distance(&records).unwrap();
        assert!((cpd - 150.0 / 620.0).abs() < 1e-12);
        assert!((cpd - 0.242).abs() < 1e-3);
    }

    #[test]
    fn test_cost_per_distance_zero_span() {
        let single = vec![record(0, 10000.0, 9.0, 50.0)];
        let flat = vec![record(0, 10000.0, 9.0, 50.0), record(3, 10000.0, 4.0, 20.0)];
        assert_eq!(cost_per_distance(&single), None);
        assert_eq!(cost_per_distance(&flat), None);
        assert_eq!(cost_per_distance(&[]), None);
    }

    #[test]
    fn test_total_spend_is_order_independent() {
        let records = vec![
            record(14, 10620.0, 11.0, 55.0),
            record(0, 10000.0, 9.0, 50.0),
            record(7, 10300.0, 10.0, 45.0),
        ];
        assert_eq!(total_spend(&records), 150.0);
        assert_eq!(total_spend(&sort_ascending(&records)), 150.0);
    }

    #[test]
    fn test_sorting_leaves_input_untouched() {
        let records = vec![record(5, 2.0, 1.0, 1.0), record(1, 1.0, 1.0, 1.0)];
        let asc = sort_ascending(&records);
        let desc = sort_descending(&records);
        assert_eq!(records[0].id, "r5");
        assert_eq!(asc[0].id, "r1");
        assert_eq!(desc[0].id, "r5");
    }

    #[test]
    fn test_economy_series_points_at_later_record() {
        let sorted = vec![
            record(0, 10000.0, 9.0, 27.0),
            record(7, 10300.0, 10.0, 30.0),
        ];
        let series = economy_series(&sorted);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].timestamp, sorted[1].timestamp);
        assert_eq!(series[0].value, 30.0);
        assert_eq!(price_series(&sorted).len(), 2);
    }
}

//! Location history: fill-ups that were tagged with coordinates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fuellog_types::FuelLogRecord;

/// A place where fuel was bought
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationVisit {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub label: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub total_cost: f64,
    pub unit_price: f64,
}

/// Newest first. Records with only one coordinate are left out.
pub fn location_history(records: &[FuelLogRecord]) -> Vec<LocationVisit> {
    let mut visits: Vec<LocationVisit> = records
        .iter()
        .filter_map(|r| {
            let (latitude, longitude) = r.coordinates()?;
            Some(LocationVisit {
                id: r.id.clone(),
                timestamp: r.timestamp,
                label: r.location.clone(),
                latitude,
                longitude,
                total_cost: r.total_cost,
                unit_price: r.unit_price,
            })
        })
        .collect();
    visits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    visits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, hour: u32, lat: Option<f64>, lon: Option<f64>) -> FuelLogRecord {
        FuelLogRecord {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
            odometer: 100.0,
            volume: 10.0,
            unit_price: 3.5,
            total_cost: 35.0,
            location: Some("Shell".to_string()),
            latitude: lat,
            longitude: lon,
            weather_temperature: None,
            weather_code: None,
        }
    }

    #[test]
    fn test_only_full_pairs_newest_first() {
        let records = vec![
            record("a", 8, Some(42.1), Some(-71.0)),
            record("b", 9, Some(42.2), None),
            record("c", 10, Some(42.3), Some(-71.2)),
            record("d", 11, None, None),
        ];
        let visits = location_history(&records);
        let ids: Vec<_> = visits.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(visits[0].label.as_deref(), Some("Shell"));
    }
}

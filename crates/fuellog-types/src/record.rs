//! Fill-up record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fill-up event.
///
/// Plain value carrier: nothing here validates odometer, volume or cost.
/// Whoever produces a record (manual entry, scan, CSV import) owns that policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogRecord {
    /// Opaque unique identifier
    pub id: String,
    /// When the fill-up happened
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    /// Cumulative distance reading
    pub odometer: f64,
    /// Fuel added
    #[serde(rename = "gallons")]
    pub volume: f64,
    /// Price per unit volume
    #[serde(rename = "pricePerGallon")]
    pub unit_price: f64,
    /// Amount paid
    pub total_cost: f64,
    /// Station name or free-text label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Ambient temperature at capture time
    #[serde(rename = "weatherTemp", default, skip_serializing_if = "Option::is_none")]
    pub weather_temperature: Option<f64>,
    /// WMO weather code at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<i32>,
}

impl FuelLogRecord {
    /// Generate a fresh record id
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Both coordinates, if both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Drop the id, keeping everything else
    pub fn without_id(&self) -> NewFuelLog {
        NewFuelLog {
            timestamp: self.timestamp,
            odometer: self.odometer,
            volume: self.volume,
            unit_price: self.unit_price,
            total_cost: self.total_cost,
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            weather_temperature: self.weather_temperature,
            weather_code: self.weather_code,
        }
    }
}

/// A fill-up that has not been assigned an id yet (decoded CSV rows, drafts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFuelLog {
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    pub odometer: f64,
    #[serde(rename = "gallons")]
    pub volume: f64,
    #[serde(rename = "pricePerGallon")]
    pub unit_price: f64,
    pub total_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "weatherTemp", default, skip_serializing_if = "Option::is_none")]
    pub weather_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<i32>,
}

impl NewFuelLog {
    /// Assign a freshly generated id
    pub fn into_record(self) -> FuelLogRecord {
        self.into_record_with_id(FuelLogRecord::new_id())
    }

    pub fn into_record_with_id(self, id: String) -> FuelLogRecord {
        FuelLogRecord {
            id,
            timestamp: self.timestamp,
            odometer: self.odometer,
            volume: self.volume,
            unit_price: self.unit_price,
            total_cost: self.total_cost,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            weather_temperature: self.weather_temperature,
            weather_code: self.weather_code,
        }
    }
}

/// Price per unit volume derived from what was paid.
///
/// Zero volume yields 0.0 rather than an infinite price.
pub fn derive_unit_price(total_cost: f64, volume: f64) -> f64 {
    if volume > 0.0 {
        total_cost / volume
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> FuelLogRecord {
        FuelLogRecord {
            id: "abc".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            odometer: 45000.0,
            volume: 12.5,
            unit_price: 3.36,
            total_cost: 42.0,
            location: Some("Sunoco".to_string()),
            latitude: Some(42.1),
            longitude: None,
            weather_temperature: None,
            weather_code: None,
        }
    }

    #[test]
    fn test_partial_coordinates_are_not_a_pair() {
        let mut record = sample();
        assert!(!record.has_coordinates());
        record.longitude = Some(-71.0);
        assert_eq!(record.coordinates(), Some((42.1, -71.0)));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["gallons"], 12.5);
        assert_eq!(json["pricePerGallon"], 3.36);
        assert_eq!(json["totalCost"], 42.0);
        assert!(json.get("date").is_some());
        assert!(json.get("longitude").is_none());
        assert!(json.get("weatherTemp").is_none());
    }

    #[test]
    fn test_into_record_generates_distinct_ids() {
        let draft = sample().without_id();
        let a = draft.clone().into_record();
        let b = draft.into_record();
        assert_ne!(a.id, b.id);
        assert_eq!(a.odometer, b.odometer);
    }

    #[test]
    fn test_derive_unit_price() {
        assert!((derive_unit_price(42.0, 12.5) - 3.36).abs() < 1e-9);
        assert_eq!(derive_unit_price(42.0, 0.0), 0.0);
    }
}

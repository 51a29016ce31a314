//! Entry Service - creating and editing fill-ups
//!
//! The record model accepts anything; this is where manual and scanned
//! entries are checked before they reach the log.

use std::path::Path;

use chrono::{DateTime, Utc};
use fuellog_domain::repository::LogStorage;
use fuellog_infra::weather::WeatherSource;
use fuellog_store::LogBook;
use fuellog_types::{derive_unit_price, Error, FuelLogRecord, NewFuelLog, Result, ScanReading};
use fuellog_vision::{scan_image, VisionBackend};
use serde::Serialize;
use tracing::{debug, warn};

/// Form fields of an entry being composed. Every field is optional until
/// `validate` decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryDraft {
    pub timestamp: Option<DateTime<Utc>>,
    pub odometer: Option<f64>,
    pub volume: Option<f64>,
    pub unit_price: Option<f64>,
    pub total_cost: Option<f64>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather_temperature: Option<f64>,
    pub weather_code: Option<i32>,
}

impl EntryDraft {
    /// Prefill from an existing record
    pub fn from_record(record: &FuelLogRecord) -> Self {
        Self {
            timestamp: Some(record.timestamp),
            odometer: Some(record.odometer),
            volume: Some(record.volume),
            unit_price: Some(record.unit_price),
            total_cost: Some(record.total_cost),
            location: record.location.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            weather_temperature: record.weather_temperature,
            weather_code: record.weather_code,
        }
    }

    /// Fields set in `changes` win
    pub fn overlay(self, changes: EntryDraft) -> Self {
        Self {
            timestamp: changes.timestamp.or(self.timestamp),
            odometer: changes.odometer.or(self.odometer),
            volume: changes.volume.or(self.volume),
            unit_price: changes.unit_price.or(self.unit_price),
            total_cost: changes.total_cost.or(self.total_cost),
            location: changes.location.or(self.location),
            latitude: changes.latitude.or(self.latitude),
            longitude: changes.longitude.or(self.longitude),
            weather_temperature: changes.weather_temperature.or(self.weather_temperature),
            weather_code: changes.weather_code.or(self.weather_code),
        }
    }

    /// Merge a scanned reading into the form.
    ///
    /// Values read from the photo replace typed ones. For pump displays the
    /// third of volume/price/total is filled in when the other two are known.
    /// Returns the names of the fields that changed.
    pub fn apply_scan(&mut self, reading: &ScanReading) -> Vec<&'static str> {
        let mut filled = Vec::new();
        match reading {
            ScanReading::Pump {
                volume,
                unit_price,
                total_cost,
            } => {
                if let Some(v) = volume {
                    self.volume = Some(*v);
                    filled.push("volume");
                }
                if let Some(p) = unit_price {
                    self.unit_price = Some(*p);
                    filled.push("unit_price");
                }
                if let Some(t) = total_cost {
                    self.total_cost = Some(*t);
                    filled.push("total_cost");
                }
                filled.extend(self.complete_pump_triple());
            }
            ScanReading::Odometer { odometer } => {
                if let Some(o) = odometer {
                    self.odometer = Some(*o);
                    filled.push("odometer");
                }
            }
            ScanReading::Unknown => {}
        }
        filled
    }

    fn complete_pump_triple(&mut self) -> Option<&'static str> {
        match (self.volume, self.unit_price, self.total_cost) {
            (Some(v), Some(p), None) => {
                self.total_cost = Some(round_to(v * p, 2));
                Some("total_cost")
            }
            (Some(v), None, Some(t)) if v > 0.0 => {
                self.unit_price = Some(round_to(t / v, 3));
                Some("unit_price")
            }
            (None, Some(p), Some(t)) if p > 0.0 => {
                self.volume = Some(round_to(t / p, 3));
                Some("volume")
            }
            _ => None,
        }
    }

    /// Check the draft and turn it into a fill-up.
    ///
    /// Odometer and volume are required, plus either the total or the unit
    /// price. Coordinates must come as a pair; weather is dropped without them.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewFuelLog> {
        let odometer = self
            .odometer
            .ok_or_else(|| invalid("odometer is required"))?;
        if !odometer.is_finite() || odometer < 0.0 {
            return Err(invalid("odometer must be a non-negative number"));
        }

        let volume = self.volume.ok_or_else(|| invalid("volume is required"))?;
        if !volume.is_finite() || volume <= 0.0 {
            return Err(invalid("volume must be greater than zero"));
        }

        let (unit_price, total_cost) = match (self.unit_price, self.total_cost) {
            (Some(p), Some(t)) => (p, t),
            (None, Some(t)) => (derive_unit_price(t, volume), t),
            (Some(p), None) => (p, round_to(p * volume, 2)),
            (None, None) => return Err(invalid("total cost or unit price is required")),
        };
        for (name, value) in [("unit price", unit_price), ("total cost", total_cost)] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{} must be a non-negative number", name)));
            }
        }

        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(invalid("coordinates out of range"));
                }
                (Some(lat), Some(lon))
            }
            (None, None) => (None, None),
            _ => return Err(invalid("latitude and longitude must be given together")),
        };
        let has_coordinates = latitude.is_some();

        Ok(NewFuelLog {
            timestamp: self.timestamp.unwrap_or(now),
            odometer,
            volume,
            unit_price,
            total_cost,
            location: self
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            latitude,
            longitude,
            weather_temperature: self.weather_temperature.filter(|_| has_coordinates),
            weather_code: self.weather_code.filter(|_| has_coordinates),
        })
    }

    /// Look up weather when coordinates are known and none was captured.
    /// Lookup failures are logged and otherwise ignored.
    pub fn enrich_weather(&mut self, source: &dyn WeatherSource) {
        if self.weather_temperature.is_some() || self.weather_code.is_some() {
            return;
        }
        let (Some(lat), Some(lon)) = (self.latitude, self.longitude) else {
            return;
        };
        match source.current(lat, lon) {
            Ok(snapshot) => {
                debug!(temperature = snapshot.temperature, code = snapshot.code, "tagged weather");
                self.weather_temperature = Some(snapshot.temperature);
                self.weather_code = Some(snapshot.code);
            }
            Err(e) => warn!(error = %e, "weather lookup failed, saving without weather"),
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidEntry(message.to_string())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Validate a draft and add it to the log
pub fn record_entry<S: LogStorage>(
    book: &mut LogBook<S>,
    mut draft: EntryDraft,
    weather: Option<&dyn WeatherSource>,
    now: DateTime<Utc>,
) -> Result<FuelLogRecord> {
    // Reject a bad draft before any network call
    draft.clone().validate(now)?;
    if let Some(source) = weather {
        draft.enrich_weather(source);
    }
    let entry = draft.validate(now)?;
    book.add_new(entry)
}

/// Replace a record with its current values overlaid by `changes`
pub fn edit_entry<S: LogStorage>(
    book: &mut LogBook<S>,
    id: &str,
    changes: EntryDraft,
) -> Result<FuelLogRecord> {
    let existing = book
        .get(id)
        .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
    let timestamp = existing.timestamp;
    let mut merged = EntryDraft::from_record(existing).overlay(changes.clone());

    // A changed volume or total invalidates a price nobody re-entered
    if changes.unit_price.is_none() && (changes.volume.is_some() || changes.total_cost.is_some()) {
        merged.unit_price = None;
    }

    let record = merged.validate(timestamp)?.into_record_with_id(id.to_string());
    book.update(record.clone())?;
    Ok(record)
}

/// Scan a photo and merge what was read into `draft`
pub fn scan_into_draft(
    backend: &dyn VisionBackend,
    image_path: &Path,
    mut draft: EntryDraft,
) -> Result<(ScanReading, EntryDraft)> {
    let reading = scan_image(backend, image_path)?;
    let filled = draft.apply_scan(&reading);
    debug!(?filled, "merged scan into draft");
    Ok((reading, draft))
}

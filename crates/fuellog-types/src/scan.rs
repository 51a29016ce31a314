//! Readings extracted from a photographed pump display or odometer

use serde::{Deserialize, Serialize};

/// What a scanned photo turned out to show.
///
/// Each variant carries only the fields that kind of display can provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanReading {
    Pump {
        volume: Option<f64>,
        unit_price: Option<f64>,
        total_cost: Option<f64>,
    },
    Odometer {
        odometer: Option<f64>,
    },
    Unknown,
}

impl ScanReading {
    pub fn label(&self) -> &'static str {
        match self {
            ScanReading::Pump { .. } => "pump display",
            ScanReading::Odometer { .. } => "odometer",
            ScanReading::Unknown => "unrecognized",
        }
    }

    /// True when no usable value was read
    pub fn is_empty(&self) -> bool {
        match self {
            ScanReading::Pump {
                volume,
                unit_price,
                total_cost,
            } => volume.is_none() && unit_price.is_none() && total_cost.is_none(),
            ScanReading::Odometer { odometer } => odometer.is_none(),
            ScanReading::Unknown => true,
        }
    }
}

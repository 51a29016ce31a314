//! Turning a model answer into a typed reading

use serde_json::Value;
use tracing::warn;

use fuellog_types::ScanReading;

/// Pull the JSON object out of an answer that may be wrapped in a
/// markdown code fence or surrounded by prose
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|i| i + 1).unwrap_or(3);
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

/// Classify an answer. Anything unreadable becomes `Unknown`.
pub fn parse_scan_response(response: &str) -> ScanReading {
    let json_str = extract_json_from_response(response);
    let value: Value = match serde_json::from_str(&json_str) {
        Ok(value) => value,
        Err(e) => {
            let truncated: String = response.chars().take(200).collect();
            warn!(error = %e, raw = %truncated, "unparseable scan response");
            return ScanReading::Unknown;
        }
    };

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    match kind.as_str() {
        "pump" => ScanReading::Pump {
            volume: number_field(&value, &["gallons", "volume"]),
            unit_price: number_field(&value, &["pricePerGallon", "unitPrice", "price"]),
            total_cost: number_field(&value, &["totalCost", "total"]),
        },
        "odometer" => ScanReading::Odometer {
            odometer: number_field(&value, &["odometer", "reading"]),
        },
        _ => ScanReading::Unknown,
    }
}

/// First usable non-negative number under any of `keys`.
/// Numeric strings such as "12.5" or "1,234" are accepted.
fn number_field(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite() && *n >= 0.0)
}

//! CSV interchange for fuel logs
//!
//! Columns, in order:
//! Date,Odometer,Gallons,Price/Gal,Total Cost,Location,Latitude,Longitude
//!
//! Decoding is tolerant: bad rows are dropped and counted, never reported
//! one by one. Ids are not part of the table; callers assign fresh ones.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use fuellog_types::{derive_unit_price, FuelLogRecord, NewFuelLog};

/// Header row written by `to_csv`
pub const CSV_HEADER: [&str; 8] = [
    "Date",
    "Odometer",
    "Gallons",
    "Price/Gal",
    "Total Cost",
    "Location",
    "Latitude",
    "Longitude",
];

/// Date, odometer, gallons, price and total must all be present
const MIN_FIELDS: usize = 5;

/// Local wall-clock format used in the Date column
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y, %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Outcome of decoding a table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Accepted rows, in input order
    pub rows: Vec<NewFuelLog>,
    /// Non-empty rows that were dropped
    pub skipped: usize,
}

/// Render records as a CSV table in the order given
pub fn to_csv(records: &[FuelLogRecord]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');

    for record in records {
        let row = [
            format_timestamp(&record.timestamp),
            record.odometer.to_string(),
            record.volume.to_string(),
            record.unit_price.to_string(),
            record.total_cost.to_string(),
            quote(record.location.as_deref().unwrap_or("")),
            format_optional(record.latitude),
            format_optional(record.longitude),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Decode a table, dating unparseable rows with the current time
pub fn parse_csv(text: &str) -> Vec<NewFuelLog> {
    parse_csv_at(text, Utc::now())
}

/// Decode a table, dating unparseable rows with `now`
pub fn parse_csv_at(text: &str, now: DateTime<Utc>) -> Vec<NewFuelLog> {
    decode_with_report(text, now).rows
}

/// Decode a table and count what was dropped.
///
/// Every physical line is its own row; a quote left open on one line never
/// swallows the next.
pub fn decode_with_report(text: &str, now: DateTime<Utc>) -> DecodeReport {
    let mut report = DecodeReport::default();

    // The first line is a header whatever it says
    for (index, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;

        let record = match split_line(line) {
            Ok(record) => record,
            Err(e) => {
                debug!(line = line_no, error = %e, "skipping unreadable csv row");
                report.skipped += 1;
                continue;
            }
        };

        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let fields: Vec<&str> = record.iter().map(clean_field).collect();
        match parse_row(&fields, now) {
            Some(row) => report.rows.push(row),
            None => {
                debug!(line = line_no, fields = fields.len(), "skipping malformed csv row");
                report.skipped += 1;
            }
        }
    }

    report
}

fn split_line(line: &str) -> csv::Result<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

fn parse_row(fields: &[&str], now: DateTime<Utc>) -> Option<NewFuelLog> {
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let odometer = parse_number(fields[1])?;
    let volume = parse_number(fields[2])?;
    let total_cost = parse_number(fields[4])?;
    let unit_price =
        parse_number(fields[3]).unwrap_or_else(|| derive_unit_price(total_cost, volume));

    let location = fields
        .get(5)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let latitude = fields.get(6).and_then(|s| parse_number(s));
    let longitude = fields.get(7).and_then(|s| parse_number(s));

    Some(NewFuelLog {
        timestamp: parse_timestamp(fields[0]).unwrap_or(now),
        odometer,
        volume,
        unit_price,
        total_cost,
        location,
        latitude,
        longitude,
        weather_temperature: None,
        weather_code: None,
    })
}

/// Render a timestamp for the Date column (local time)
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

/// Lenient timestamp parsing. Values without an offset are local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return local_to_utc(date.and_hms_opt(0, 0, 0)?);
        }
    }

    None
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Rows are one line each, so line breaks inside a value become spaces
fn quote(s: &str) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    format!("\"{}\"", flat.replace('"', "\"\""))
}

fn clean_field(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
}

//! File boundary for CSV import and export

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use fuellog_types::{Error, Result};

/// Read a CSV file as text, tolerating a UTF-8 byte order mark
pub fn read_csv_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let text = fs::read_to_string(path)?;
    Ok(text
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(text))
}

/// Write CSV text, creating parent directories as needed
pub fn write_csv_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

/// Default export name, e.g. `fuel-logs-2024-03-01.csv`
pub fn default_export_name(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!(
        "fuel-logs-{}.csv",
        now.with_timezone(&Local).format("%Y-%m-%d")
    ))
}

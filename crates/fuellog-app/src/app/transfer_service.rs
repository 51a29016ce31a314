//! Transfer Service - CSV import and export

use std::path::Path;

use chrono::{DateTime, Utc};
use fuellog_domain::repository::LogStorage;
use fuellog_infra::csv_codec::{decode_with_report, to_csv};
use fuellog_infra::transfer::{read_csv_file, write_csv_file};
use fuellog_store::LogBook;
use fuellog_types::{NewFuelLog, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// What to do with the records already in the log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    #[default]
    Append,
    Replace,
}

/// Counts reported after an import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    /// Records removed by a replacing import
    pub replaced: usize,
}

/// Decode without touching the log
pub fn preview_import(text: &str, now: DateTime<Utc>) -> (Vec<NewFuelLog>, ImportSummary) {
    let report = decode_with_report(text, now);
    let summary = ImportSummary {
        imported: report.rows.len(),
        skipped: report.skipped,
        replaced: 0,
    };
    (report.rows, summary)
}

/// Decode CSV text into the log. Every row gets a fresh id.
pub fn import_csv<S: LogStorage>(
    book: &mut LogBook<S>,
    text: &str,
    mode: ImportMode,
    now: DateTime<Utc>,
) -> Result<ImportSummary> {
    let (rows, mut summary) = preview_import(text, now);

    match mode {
        ImportMode::Append => {
            book.add_many(rows)?;
        }
        ImportMode::Replace => {
            summary.replaced = book.len();
            book.replace_all(rows.into_iter().map(NewFuelLog::into_record).collect())?;
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        replaced = summary.replaced,
        "csv import finished"
    );
    Ok(summary)
}

pub fn import_csv_file<S: LogStorage>(
    book: &mut LogBook<S>,
    path: &Path,
    mode: ImportMode,
) -> Result<ImportSummary> {
    let text = read_csv_file(path)?;
    import_csv(book, &text, mode, Utc::now())
}

/// Render the log newest first, the way the list shows it
pub fn export_csv<S: LogStorage>(book: &LogBook<S>) -> String {
    to_csv(&book.newest_first())
}

/// Write the export to `path`, returning the number of rows written
pub fn export_csv_file<S: LogStorage>(book: &LogBook<S>, path: &Path) -> Result<usize> {
    write_csv_file(path, &export_csv(book))?;
    info!(path = %path.display(), rows = book.len(), "csv export written");
    Ok(book.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fuellog_infra::persistence::MemoryStorage;
    use tempfile::tempdir;

    const TABLE: &str = "Date,Odometer,Gallons,Price/Gal,Total Cost,Location,Latitude,Longitude
2024-03-01 08:00:00,10000,9,3,27,\"Shell\",42.1,-71.0
2024-03-08 08:00:00,10300,10,,30,\"Sunoco\",,
bad,row
2024-03-15 08:00:00,abc,11,3,33,\"\",,
2024-03-22 08:00:00,10620,11,3,33,\"\",,
";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_import_appends_and_counts() {
        let storage = MemoryStorage::new();
        let mut book = LogBook::open(&storage).unwrap();
        let summary = import_csv(&mut book, TABLE, ImportMode::Append, now()).unwrap();
        assert_eq!(summary.imported, 3);
        assert_eq!(summary.skipped, 2);
        assert_eq!(book.len(), 3);

        import_csv(&mut book, TABLE, ImportMode::Append, now()).unwrap();
        assert_eq!(book.len(), 6);
    }

    #[test]
    fn test_import_replace() {
        let storage = MemoryStorage::new();
        let mut book = LogBook::open(&storage).unwrap();
        import_csv(&mut book, TABLE, ImportMode::Append, now()).unwrap();
        let summary = import_csv(&mut book, TABLE, ImportMode::Replace, now()).unwrap();
        assert_eq!(summary.replaced, 3);
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn test_export_then_import_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs.csv");

        let source_storage = MemoryStorage::new();
        let mut source = LogBook::open(&source_storage).unwrap();
        import_csv(&mut source, TABLE, ImportMode::Append, now()).unwrap();
        assert_eq!(export_csv_file(&source, &path).unwrap(), 3);

        let target_storage = MemoryStorage::new();
        let mut target = LogBook::open(&target_storage).unwrap();
        let summary = import_csv_file(&mut target, &path, ImportMode::Append).unwrap();
        assert_eq!(summary.imported, 3);
        assert_eq!(summary.skipped, 0);

        let summary_a = source.summary();
        let summary_b = target.summary();
        assert_eq!(summary_a.total_spend, summary_b.total_spend);
        assert_eq!(summary_a.distance_span, summary_b.distance_span);

        // Newest first on disk
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().nth(1).unwrap().contains(",10620,"));
    }
}

//! Application Layer
//!
//! Orchestrates between the CLI and the domain/infrastructure layers:
//! - `entry_service`: manual and scan-assisted entry, edits
//! - `transfer_service`: CSV import and export
//! - `query_service`: list, statistics, trends, location history

pub mod entry_service;
pub mod query_service;
pub mod transfer_service;

pub use entry_service::{edit_entry, record_entry, scan_into_draft, EntryDraft};
pub use query_service::{locations, log_rows, trend_report, LogRow, TrendReport};
pub use transfer_service::{
    export_csv, export_csv_file, import_csv, import_csv_file, preview_import, ImportMode,
    ImportSummary,
};

//! Repository adapters for persistence layer

use std::path::PathBuf;

use fuellog_infra::persistence::JsonFileStorage;
use fuellog_store::LogBook;
use fuellog_types::Result;

use crate::config::Config;

/// Open the fuel log in the configured data directory
pub fn open_log_book(config: &Config) -> Result<LogBook<JsonFileStorage>> {
    open_log_book_at(config.data_dir()?)
}

/// Open the fuel log at a custom directory
pub fn open_log_book_at(data_dir: PathBuf) -> Result<LogBook<JsonFileStorage>> {
    LogBook::open(JsonFileStorage::open(data_dir)?)
}

//! Repository trait definitions for data persistence

use fuellog_types::Result;

/// Storage key under which the whole fuel log collection is kept
pub const FUEL_LOGS_KEY: &str = "fuel_logs";

/// Named-blob storage port.
///
/// Implementations only store and retrieve opaque text; the collection
/// decides what goes in the blob.
pub trait LogStorage {
    /// Read a blob, `None` if nothing was stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the blob stored under `key`
    fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Forget `key` entirely
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: LogStorage + ?Sized> LogStorage for &T {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        (**self).save(key, blob)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: LogStorage + ?Sized> LogStorage for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        (**self).save(key, blob)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

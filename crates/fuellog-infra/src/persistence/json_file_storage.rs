//! File-backed named-blob storage
//!
//! Each key lives in `<dir>/<key>.json`. Writes go to a temporary sibling
//! first and are renamed into place.

use std::fs;
use std::path::PathBuf;

use fuellog_domain::repository::LogStorage;
use fuellog_types::{Result, StorageError};
use tracing::debug;

pub struct JsonFileStorage {
    store_dir: PathBuf,
}

impl JsonFileStorage {
    /// Use (and create if needed) `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        Ok(Self { store_dir })
    }

    pub fn store_dir(&self) -> &PathBuf {
        &self.store_dir
    }

    /// Path holding the blob for `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::IoError(format!("invalid storage key: {:?}", key)).into());
        }
        Ok(self.store_dir.join(format!("{}.json", key)))
    }
}

impl LogStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&path)?;
        debug!(path = %path.display(), bytes = blob.len(), "read blob");
        Ok(Some(blob))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = blob.len(), "wrote blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_remove() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.load("fuel_logs").unwrap(), None);
        storage.save("fuel_logs", "[]").unwrap();
        storage.save("fuel_logs", "[1]").unwrap();
        assert_eq!(storage.load("fuel_logs").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("nested").join("fuel_logs.json").exists());

        storage.remove("fuel_logs").unwrap();
        assert_eq!(storage.load("fuel_logs").unwrap(), None);
        storage.remove("fuel_logs").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path().to_path_buf()).unwrap();
        assert!(storage.save("../escape", "x").is_err());
        assert!(storage.load("").is_err());
    }
}

//! The fuel log collection
//!
//! `LogBook` owns every record in memory and writes the whole collection back
//! through its `LogStorage` after each change. There is no incremental
//! diffing: one key, one JSON array, overwritten in full.

use fuellog_domain::repository::{LogStorage, FUEL_LOGS_KEY};
use fuellog_domain::service::{sort_ascending, sort_descending, LogSummary};
use fuellog_types::{Error, FuelLogRecord, NewFuelLog, Result};
use tracing::{debug, warn};

/// Process-wide record collection backed by a storage port
pub struct LogBook<S: LogStorage> {
    storage: S,
    records: Vec<FuelLogRecord>,
}

impl<S: LogStorage> LogBook<S> {
    /// Load the collection from `storage`.
    ///
    /// Unreadable stored data is logged and treated as an empty log.
    pub fn open(storage: S) -> Result<Self> {
        let records = match storage.load(FUEL_LOGS_KEY)? {
            Some(blob) => match serde_json::from_str::<Vec<FuelLogRecord>>(&blob) {
                Ok(records) => records,
                Err(e) => {
                    warn!(error = %e, "stored fuel logs are unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!(count = records.len(), "loaded fuel logs");

        Ok(Self { storage, records })
    }

    /// Persist `records` and only then make them current, so a failed
    /// write leaves the in-memory log as it was
    fn commit(&mut self, records: Vec<FuelLogRecord>) -> Result<()> {
        let blob = serde_json::to_string(&records)?;
        self.storage.save(FUEL_LOGS_KEY, &blob)?;
        debug!(count = records.len(), "saved fuel logs");
        self.records = records;
        Ok(())
    }

    /// Records in storage order
    pub fn records(&self) -> &[FuelLogRecord] {
        &self.records
    }

    /// Display order
    pub fn newest_first(&self) -> Vec<FuelLogRecord> {
        sort_descending(&self.records)
    }

    /// Trend order
    pub fn oldest_first(&self) -> Vec<FuelLogRecord> {
        sort_ascending(&self.records)
    }

    pub fn get(&self, id: &str) -> Option<&FuelLogRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> LogSummary {
        LogSummary::from_records(&self.records)
    }

    /// Add a record that already carries an id
    pub fn add(&mut self, record: FuelLogRecord) -> Result<String> {
        if self.get(&record.id).is_some() {
            return Err(Error::InvalidEntry(format!("duplicate id {}", record.id)));
        }
        let id = record.id.clone();
        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)?;
        Ok(id)
    }

    /// Add a fill-up, assigning it a fresh id
    pub fn add_new(&mut self, entry: NewFuelLog) -> Result<FuelLogRecord> {
        let record = entry.into_record();
        self.add(record.clone())?;
        Ok(record)
    }

    /// Add several fill-ups with a single write
    pub fn add_many(&mut self, entries: Vec<NewFuelLog>) -> Result<usize> {
        let count = entries.len();
        if count == 0 {
            return Ok(0);
        }
        let mut next = self.records.clone();
        next.extend(entries.into_iter().map(NewFuelLog::into_record));
        self.commit(next)?;
        Ok(count)
    }

    /// Replace the record with the same id
    pub fn update(&mut self, record: FuelLogRecord) -> Result<()> {
        let index = self
            .position(&record.id)
            .ok_or_else(|| Error::RecordNotFound(record.id.clone()))?;
        let mut next = self.records.clone();
        next[index] = record;
        self.commit(next)
    }

    /// Remove a record by id, returning it
    pub fn delete(&mut self, id: &str) -> Result<FuelLogRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
        let mut next = self.records.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Remove everything, returning how many records were dropped
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.records.len();
        self.commit(Vec::new())?;
        Ok(count)
    }

    /// Swap in a whole new collection.
    ///
    /// Later duplicates of an id are given fresh ids so ids stay unique.
    pub fn replace_all(&mut self, records: Vec<FuelLogRecord>) -> Result<()> {
        let mut unique: Vec<FuelLogRecord> = Vec::with_capacity(records.len());
        for mut record in records {
            if unique.iter().any(|r| r.id == record.id) {
                record.id = FuelLogRecord::new_id();
            }
            unique.push(record);
        }
        self.commit(unique)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct TestStorage {
        blobs: RefCell<HashMap<String, String>>,
        writes: RefCell<usize>,
    }

    impl LogStorage for TestStorage {
        fn load(&self, key: &str) -> Result<Option<String>> {
            Ok(self.blobs.borrow().get(key).cloned())
        }

        fn save(&self, key: &str, blob: &str) -> Result<()> {
            *self.writes.borrow_mut() += 1;
            self.blobs
                .borrow_mut()
                .insert(key.to_string(), blob.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.blobs.borrow_mut().remove(key);
            Ok(())
        }
    }

    /// Loads what it was given, refuses every write
    struct ReadOnlyStorage(Option<String>);

    impl LogStorage for ReadOnlyStorage {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(self.0.clone())
        }

        fn save(&self, _key: &str, _blob: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn entry(day: i64, odometer: f64) -> NewFuelLog {
        NewFuelLog {
            timestamp: Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap() + Duration::days(day),
            odometer,
            volume: 10.0,
            unit_price: 3.5,
            total_cost: 35.0,
            location: None,
            latitude: None,
            longitude: None,
            weather_temperature: None,
            weather_code: None,
        }
    }

    #[test]
    fn test_every_mutation_persists_full_collection() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        let first = book.add_new(entry(0, 1000.0)).unwrap();
        book.add_new(entry(7, 1300.0)).unwrap();
        assert_eq!(*storage.writes.borrow(), 2);

        let reopened = LogBook::open(&storage).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&first.id), Some(&first));
    }

    #[test]
    fn test_update_replaces_by_id() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        let mut record = book.add_new(entry(0, 1000.0)).unwrap();
        record.location = Some("Mobil".to_string());
        book.update(record.clone()).unwrap();
        assert_eq!(book.get(&record.id).unwrap().location.as_deref(), Some("Mobil"));

        let mut stranger = record;
        stranger.id = "missing".to_string();
        assert!(matches!(book.update(stranger), Err(Error::RecordNotFound(_))));
    }

    #[test]
    fn test_delete_and_clear() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        let a = book.add_new(entry(0, 1000.0)).unwrap();
        book.add_new(entry(1, 1100.0)).unwrap();

        let removed = book.delete(&a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert!(matches!(book.delete(&a.id), Err(Error::RecordNotFound(_))));
        assert_eq!(book.clear().unwrap(), 1);
        assert!(LogBook::open(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected_on_add() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        let record = book.add_new(entry(0, 1000.0)).unwrap();
        assert!(matches!(book.add(record), Err(Error::InvalidEntry(_))));
    }

    #[test]
    fn test_replace_all_keeps_ids_unique() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        let record = entry(0, 1000.0).into_record_with_id("same".to_string());
        book.replace_all(vec![record.clone(), record]).unwrap();
        assert_eq!(book.len(), 2);
        assert_ne!(book.records()[0].id, book.records()[1].id);
    }

    #[test]
    fn test_add_many_writes_once() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        let added = book
            .add_many(vec![entry(0, 1000.0), entry(1, 1200.0), entry(2, 1400.0)])
            .unwrap();
        assert_eq!(added, 3);
        assert_eq!(*storage.writes.borrow(), 1);
        assert_eq!(book.add_many(Vec::new()).unwrap(), 0);
    }

    #[test]
    fn test_ordering_views() {
        let storage = TestStorage::default();
        let mut book = LogBook::open(&storage).unwrap();
        book.add_new(entry(5, 1500.0)).unwrap();
        book.add_new(entry(0, 1000.0)).unwrap();
        assert_eq!(book.newest_first()[0].odometer, 1500.0);
        assert_eq!(book.oldest_first()[0].odometer, 1000.0);
    }

    #[test]
    fn test_corrupt_blob_opens_empty() {
        let storage = TestStorage::default();
        storage.save(FUEL_LOGS_KEY, "{not json").unwrap();
        let book = LogBook::open(&storage).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_log_unchanged() {
        let existing = entry(0, 1000.0).into_record_with_id("kept".to_string());
        let blob = serde_json::to_string(&vec![existing.clone()]).unwrap();
        let mut book = LogBook::open(ReadOnlyStorage(Some(blob))).unwrap();

        assert!(book.add_new(entry(1, 1100.0)).is_err());
        assert!(book.add_many(vec![entry(2, 1200.0)]).is_err());
        let mut changed = existing.clone();
        changed.odometer = 9999.0;
        assert!(book.update(changed).is_err());
        assert!(book.delete("kept").is_err());
        assert!(book.clear().is_err());
        assert!(book.replace_all(Vec::new()).is_err());

        assert_eq!(book.records(), &[existing][..]);
    }
}

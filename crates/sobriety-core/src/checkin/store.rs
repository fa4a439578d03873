use std::collections::HashMap;

use super::{CalendarDay, CheckIn};
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key for the check-in collection. Stable across releases.
pub const CHECKINS_KEY: &str = "sobriety-checkins";

/// The check-in collection, at most one record per calendar day.
///
/// Every mutation writes the whole collection back through the storage
/// port; there is no incremental persistence.
pub struct CheckInStore<S: KeyValueStore> {
    storage: S,
    records: Vec<CheckIn>,
}

impl<S: KeyValueStore> CheckInStore<S> {
    /// Empty store that has not read anything from `storage`.
    pub fn empty(storage: S) -> Self {
        Self {
            storage,
            records: Vec::new(),
        }
    }

    /// Hydrate from storage.
    ///
    /// A missing key, an unreadable backend or a malformed document all
    /// yield an empty store.
    pub fn load(storage: S) -> Self {
        let records = match storage.get(CHECKINS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<CheckIn>>(&json) {
                Ok(records) => dedup_by_day(records),
                Err(e) => {
                    tracing::warn!(error = %e, "stored check-ins are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored check-ins, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = records.len(), "loaded check-ins");
        Self { storage, records }
    }

    /// Insert `record`, fully replacing any record for the same day.
    ///
    /// Returns the replaced record. The in-memory collection is updated
    /// even when persisting fails.
    pub fn upsert(&mut self, record: CheckIn) -> Result<Option<CheckIn>, StorageError> {
        let replaced = self
            .records
            .iter()
            .position(|r| r.day == record.day)
            .map(|index| self.records.remove(index));

        tracing::debug!(
            day = %record.day,
            mood = %record.mood,
            replaced = replaced.is_some(),
            "upserting check-in"
        );
        self.records.push(record);
        self.persist()?;
        Ok(replaced)
    }

    /// Replace the entire collection. Duplicate days keep the last record.
    pub fn replace_all(&mut self, records: Vec<CheckIn>) -> Result<(), StorageError> {
        self.records = dedup_by_day(records);
        self.persist()
    }

    /// The full collection, in no particular order.
    pub fn all(&self) -> &[CheckIn] {
        &self.records
    }

    pub fn find_by_day(&self, day: CalendarDay) -> Option<&CheckIn> {
        self.records.iter().find(|r| r.day == day)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.records)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.storage.set(CHECKINS_KEY, &json)
    }
}

/// Collapse records sharing a day; the later record wins and takes the
/// position of the first occurrence.
fn dedup_by_day(records: Vec<CheckIn>) -> Vec<CheckIn> {
    let mut index_by_day: HashMap<CalendarDay, usize> = HashMap::new();
    let mut unique: Vec<CheckIn> = Vec::with_capacity(records.len());

    for record in records {
        match index_by_day.get(&record.day) {
            Some(&index) => unique[index] = record,
            None => {
                index_by_day.insert(record.day, unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::{Habit, Mood};
    use crate::storage::MemoryStore;

    fn day(d: u32) -> CalendarDay {
        CalendarDay::from_ymd(2026, 10, d).unwrap()
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn upsert_same_day_overwrites() {
        let storage = MemoryStore::new();
        let mut store = CheckInStore::empty(&storage);

        let first = CheckIn::new(day(16), Mood::Bad, [Habit::Weed]);
        let second = CheckIn::new(day(16), Mood::Great, []);

        assert!(store.upsert(first.clone()).unwrap().is_none());
        let replaced = store.upsert(second.clone()).unwrap();

        assert_eq!(replaced, Some(first));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_day(day(16)), Some(&second));
    }

    #[test]
    fn upsert_persists_whole_collection() {
        let storage = MemoryStore::new();
        let mut store = CheckInStore::empty(&storage);
        store.upsert(CheckIn::new(day(15), Mood::Okay, [])).unwrap();
        store.upsert(CheckIn::new(day(16), Mood::Good, [])).unwrap();

        let reloaded = CheckInStore::load(&storage);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.find_by_day(day(15)).is_some());
    }

    #[test]
    fn load_tolerates_missing_and_malformed() {
        let empty = MemoryStore::new();
        assert!(CheckInStore::load(&empty).is_empty());

        let malformed = MemoryStore::with_entries([(CHECKINS_KEY, "{not json")]);
        assert!(CheckInStore::load(&malformed).is_empty());

        let wrong_shape = MemoryStore::with_entries([(CHECKINS_KEY, r#"{"date":1}"#)]);
        assert!(CheckInStore::load(&wrong_shape).is_empty());

        assert!(CheckInStore::load(FailingStore).is_empty());
    }

    #[test]
    fn load_reads_legacy_date_strings() {
        let storage = MemoryStore::with_entries([(
            CHECKINS_KEY,
            r#"[{"date":"Fri Oct 16 2026","mood":"great","habits":[]},
                {"date":"Thu Oct 15 2026","mood":"bad","habits":["alcohol"]}]"#,
        )]);
        let store = CheckInStore::load(&storage);
        assert_eq!(store.len(), 2);
        assert!(store.find_by_day(day(15)).unwrap().used(Habit::Alcohol));
    }

    #[test]
    fn load_collapses_duplicate_days() {
        let storage = MemoryStore::with_entries([(
            CHECKINS_KEY,
            r#"[{"date":"2026-10-16","mood":"bad","habits":[]},
                {"date":"Fri Oct 16 2026","mood":"great","habits":[]}]"#,
        )]);
        let store = CheckInStore::load(&storage);
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_day(day(16)).unwrap().mood, Mood::Great);
    }

    #[test]
    fn replace_all_discards_previous_records() {
        let storage = MemoryStore::new();
        let mut store = CheckInStore::empty(&storage);
        store.upsert(CheckIn::new(day(1), Mood::Okay, [])).unwrap();

        store
            .replace_all(vec![
                CheckIn::new(day(10), Mood::Good, []),
                CheckIn::new(day(11), Mood::Good, []),
            ])
            .unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.find_by_day(day(1)).is_none());
        assert_eq!(CheckInStore::load(&storage).len(), 2);
    }

    #[test]
    fn failed_persist_still_updates_memory() {
        let mut store = CheckInStore::empty(FailingStore);
        let result = store.upsert(CheckIn::new(day(16), Mood::Good, []));
        assert!(matches!(result, Err(StorageError::Locked)));
        assert_eq!(store.len(), 1);
    }
}

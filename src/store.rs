use crate::models::{DailyProgressRecord, GlobalStatsRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::error;

pub const DAILY_RECORD_KEY: &str = "dmo.daily.v1";
pub const GLOBAL_STATS_KEY: &str = "dmo.stats.v1";

/// Failure to write a record into the store. Non-fatal by contract: callers
/// surface it as a warning and keep the in-memory state authoritative.
#[derive(Debug)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

/// String-keyed record store with the same surface the checklist originally
/// had in browser local storage: get, set, remove.
pub trait RecordStore {
    fn get(&self, key: &str) -> Option<&str>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store, mirrored to disk as one JSON blob by the storage module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KvStore {
    pub entries: BTreeMap<String, String>,
}

impl RecordStore for KvStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

pub fn load_daily(store: &dyn RecordStore) -> Option<DailyProgressRecord> {
    decode(store.get(DAILY_RECORD_KEY)?, DAILY_RECORD_KEY)
}

pub fn save_daily(store: &mut dyn RecordStore, record: &DailyProgressRecord) -> Result<(), StoreError> {
    let payload = serde_json::to_string(record).map_err(|err| StoreError::new(err.to_string()))?;
    store.set(DAILY_RECORD_KEY, payload)
}

pub fn load_stats(store: &dyn RecordStore) -> Option<GlobalStatsRecord> {
    decode(store.get(GLOBAL_STATS_KEY)?, GLOBAL_STATS_KEY)
}

pub fn save_stats(store: &mut dyn RecordStore, stats: &GlobalStatsRecord) -> Result<(), StoreError> {
    let payload = serde_json::to_string(stats).map_err(|err| StoreError::new(err.to_string()))?;
    store.set(GLOBAL_STATS_KEY, payload)
}

// A malformed stored value is treated as absent, never as a fatal error.
fn decode<T: DeserializeOwned>(raw: &str, key: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            error!("failed to parse stored record at {key}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn daily_record_round_trips() {
        let mut store = KvStore::default();
        let record = DailyProgressRecord {
            date: "2026-03-10".to_string(),
            variant: "express".to_string(),
            checked_task_ids: BTreeSet::from(["add-friends".to_string(), "follow-ups".to_string()]),
            snapshot: Default::default(),
            submitted: false,
            submitted_at: None,
        };

        save_daily(&mut store, &record).unwrap();
        let loaded = load_daily(&store).expect("record present");
        assert_eq!(loaded.date, record.date);
        assert_eq!(loaded.variant, record.variant);
        assert_eq!(loaded.checked_task_ids, record.checked_task_ids);
        assert!(!loaded.submitted);
    }

    #[test]
    fn missing_keys_load_as_absent() {
        let store = KvStore::default();
        assert!(load_daily(&store).is_none());
        assert!(load_stats(&store).is_none());
    }

    #[test]
    fn malformed_daily_blob_loads_as_absent() {
        let mut store = KvStore::default();
        store
            .set(DAILY_RECORD_KEY, "{not valid json".to_string())
            .unwrap();
        assert!(load_daily(&store).is_none());
    }

    #[test]
    fn wrong_shape_stats_blob_loads_as_absent() {
        let mut store = KvStore::default();
        store
            .set(GLOBAL_STATS_KEY, r#"{"current_streak_days":"five"}"#.to_string())
            .unwrap();
        assert!(load_stats(&store).is_none());
    }

    #[test]
    fn stats_round_trip_keeps_every_field() {
        let mut store = KvStore::default();
        let stats = GlobalStatsRecord {
            current_streak_days: 12,
            last_completed_date: Some("2026-03-09".to_string()),
            total_xp_all_time: 4_200,
            today_completed_count: 6,
        };
        save_stats(&mut store, &stats).unwrap();
        assert_eq!(load_stats(&store), Some(stats));
    }
}

//! Persistence layer.
//!
//! The core sees persistence only through [`KeyValueStore`]: string keys,
//! string values, read at startup and written after each mutation.
//! Writes never fail a mutation. When the backend is unreachable the caller
//! keeps working from memory and the failure is logged.

mod config;
pub mod database;
pub mod memory;

pub use config::{BlocklistConfig, Config, FocusConfig, TasksConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{ConfigError, StoreError};

/// Persisted key for the serialized task collection.
pub const TASKS_KEY: &str = "tasks";
/// Persisted key for today's accumulated focus seconds.
pub const TOTAL_FOCUS_KEY: &str = "totalFocusToday";
/// Persisted key for the day the focus total belongs to.
pub const LAST_DATE_KEY: &str = "lastDate";
/// Persisted key for the distraction watchlist.
pub const BLOCKED_SITES_KEY: &str = "blockedSites";

/// String-keyed durable storage scoped to one user.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The store the CLI runs on: SQLite when it opens, memory otherwise.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl StoreBackend {
    /// Open the default SQLite store, falling back to memory-only operation.
    pub fn open_default() -> Self {
        match SqliteStore::open() {
            Ok(store) => StoreBackend::Sqlite(store),
            Err(e) => {
                warn!(error = %e, "persistent store unavailable, changes will not be saved");
                StoreBackend::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for StoreBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get(key),
            StoreBackend::Memory(m) => m.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.set(key, value),
            StoreBackend::Memory(m) => m.set(key, value),
        }
    }
}

/// Read a raw value, treating an unreachable store as "absent".
pub(crate) fn read_or_absent<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "store read failed, continuing without persisted value");
            None
        }
    }
}

/// Read and decode a JSON value. Corrupt data is logged and treated as absent.
pub(crate) fn read_json<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let raw = read_or_absent(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable persisted value");
            None
        }
    }
}

/// Write a value, keeping in-memory state authoritative on failure.
///
/// Returns `false` when the write did not reach the store.
pub(crate) fn write_through<S: KeyValueStore>(store: &S, key: &str, value: &str) -> bool {
    match store.set(key, value) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "store write failed, keeping state in memory only");
            false
        }
    }
}

/// Serialize `value` as JSON and write it with a single `set`.
///
/// Returns `false` when nothing reached the store.
pub(crate) fn write_json<S: KeyValueStore, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => write_through(store, key, &json),
        Err(e) => {
            warn!(key, error = %e, "could not serialize value, keeping state in memory only");
            false
        }
    }
}

/// Returns the Focusboard data directory, creating it when missing.
///
/// Resolution order:
/// - `FOCUSBOARD_DATA_DIR` when set
/// - `~/.config/focusboard-dev/` when `FOCUSBOARD_ENV=dev`
/// - `~/.config/focusboard/`
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSBOARD_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusboard-dev")
            } else {
                base_dir.join("focusboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn broken_store_reads_as_absent() {
        assert_eq!(read_or_absent(&BrokenStore, TASKS_KEY), None);
        assert!(!write_through(&BrokenStore, TASKS_KEY, "[]"));
    }

    #[test]
    fn memory_backend_reads_its_writes() {
        let backend = StoreBackend::Memory(MemoryStore::new());
        backend.set(TOTAL_FOCUS_KEY, "5").unwrap();
        assert_eq!(backend.get(TOTAL_FOCUS_KEY).unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn unserializable_value_is_not_written() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let value: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let store = MemoryStore::new();
        assert!(!write_json(&store, BLOCKED_SITES_KEY, &value));
        assert_eq!(store.get(BLOCKED_SITES_KEY).unwrap(), None);

        assert!(write_json(&store, BLOCKED_SITES_KEY, &["x.com"]));
        assert_eq!(
            store.get(BLOCKED_SITES_KEY).unwrap().as_deref(),
            Some(r#"["x.com"]"#)
        );
    }

    #[test]
    fn corrupt_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(BLOCKED_SITES_KEY, "{not json").unwrap();
        let sites: Option<Vec<String>> = read_json(&store, BLOCKED_SITES_KEY);
        assert!(sites.is_none());
    }
}

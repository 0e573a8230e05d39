//! Key-value state store abstraction.
//!
//! Five records live under fixed keys; values are JSON strings. The store
//! is injected into the dispatcher rather than reached as a global, so
//! tests run against [`MemoryStore`].
//!
//! Reads substitute record defaults for missing or malformed values, and
//! writes absorb failures: no store operation is ever fatal. The worst
//! case is a stale display or an unblocked navigation until the next poll.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreError;

/// Keys of the five persisted records.
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const BLOCKLIST: &str = "blocklist";
    pub const SESSION: &str = "session";
    pub const STATS: &str = "stats";
    pub const BYPASS: &str = "bypass";
}

pub trait StateStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Decode a stored record, substituting `default` when the record is
/// missing, malformed, or the read fails.
pub fn read_record<T, S>(store: &S, key: &str, default: impl FnOnce() -> T) -> T
where
    T: DeserializeOwned,
    S: StateStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|error| {
            warn!(key, %error, "malformed record, using default");
            default()
        }),
        Ok(None) => default(),
        Err(error) => {
            warn!(key, %error, "store read failed, using default");
            default()
        }
    }
}

/// Encode and persist a record, absorbing failures.
pub fn write_record<T, S>(store: &S, key: &str, value: &T)
where
    T: Serialize,
    S: StateStore + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Err(error) = store.set(key, &json) {
                warn!(key, %error, "store write failed");
            }
        }
        Err(error) => warn!(key, %error, "record serialization failed"),
    }
}

/// In-memory store for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//! Key-value backend abstraction for the durable cache tier.
//!
//! The durable tier is a plain string-to-string store: namespaced keys,
//! JSON-serialized values. Backends are interchangeable behind [`KvStore`];
//! the SQLite implementation lives in the storage crate, and the in-memory
//! implementation below backs tests and keyless/degraded setups.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

/// Errors surfaced by a durable key-value backend.
///
/// These never cross the cache-store API: a failing backend degrades the
/// cache to memory-only behavior and the failure is reported through logging
/// alone.
#[derive(Error, Debug)]
pub enum KvError {
    /// The backend could not serve the request (I/O failure, capacity
    /// exceeded, pool exhausted).
    #[error("Key-value backend unavailable: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("Stored value could not be decoded: {0}")]
    Corrupt(String),
}

/// A durable string key-value store.
pub trait KvStore: Send + Sync {
    /// Read the value for `key`, if present.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), KvError>;

    /// List every stored key.
    fn keys(&self) -> Result<Vec<String>, KvError>;

    /// Delete everything.
    fn clear(&self) -> Result<(), KvError>;
}

/// In-memory [`KvStore`].
///
/// Used in tests and as the fallback backend when no durable store is
/// configured; contents are lost on restart.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, KvError> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), KvError> {
        self.lock().clear();
        Ok(())
    }
}

//! Local key-value store collaborator.
//!
//! The session treats this as durable, synchronous, single-writer
//! storage scoped to the browsing session. Writes must succeed for a
//! mutation to be reported as successful; contrast with the remote
//! store, where failures are swallowed.

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;

/// Errors reported by a [`LocalStore`] implementation.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// A read could not be served.
    #[error("Local read failed for {key:?}: {reason}")]
    Read { key: String, reason: String },

    /// A write was not durably applied (quota, I/O, backend down).
    #[error("Local write failed for {key:?}: {reason}")]
    Write { key: String, reason: String },
}

/// Synchronous key-value persistence.
///
/// Implementations wrap whatever the host platform offers: browser
/// local storage behind a bridge, a file, or [`MemoryStore`] for tests
/// and ephemeral sessions.
pub trait LocalStore: Send + Sync {
    /// Fetch the string stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` if the backend cannot serve the read.
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Durably store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` if the write was not applied.
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
}

/// In-memory [`LocalStore`]. Contents vanish with the process; useful
/// for tests and for sessions that do not need persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("cart").unwrap().is_none());

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("cart", "[]").unwrap();
        store.set("cart", "[1]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[1]"));
    }
}

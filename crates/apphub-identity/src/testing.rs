//! In-memory store for testing.
//!
//! Provides a BTreeMap-based [`KeyValueStore`] that does not persist.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::cell::RefCell;

use crate::error::StorageError;
use crate::store::KeyValueStore;

/// In-memory key/value store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    failing_key: Option<String>,
    failing_removes: bool,
    writes: RefCell<u32>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `key` fail with [`StorageError::QuotaExceeded`].
    pub fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.failing_key = Some(key.into());
        self
    }

    /// Make every removal fail with [`StorageError::Unavailable`].
    pub fn failing_removes(mut self) -> Self {
        self.failing_removes = true;
        self
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        *self.writes.borrow()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_key.as_deref() == Some(key) {
            return Err(StorageError::QuotaExceeded);
        }
        self.entries
            .borrow_mut()
            .insert(String::from(key), String::from(value));
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.failing_removes {
            return Err(StorageError::Unavailable);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

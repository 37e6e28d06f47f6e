//! In-memory storage doubles for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::db::KeyValueStore;
use crate::errors::AppError;

/// Map-backed [`KeyValueStore`]. Writes can be switched off, globally or per
/// key, to simulate a storage outage.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    failing_keys: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.put(key, value);
        store
    }

    /// Seed or overwrite a value without going through the trait.
    pub fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Raw value currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes to `key` alone fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    fn check_writable(&self, key: &str) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst)
            || self.failing_keys.lock().unwrap().contains(key)
        {
            return Err(AppError::Storage("storage is read-only".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.check_writable(key)?;
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.check_writable(key)?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

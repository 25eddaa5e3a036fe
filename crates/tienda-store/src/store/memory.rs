//! In-memory record store, with write fault injection for tests.

use std::collections::{HashMap, HashSet};

use crate::error::{StoreError, StoreResult};
use crate::store::{RecordKey, RecordStore};

/// `HashMap`-backed store. Nothing survives the process.
///
/// ## Fault Injection
/// ```rust
/// use tienda_store::{MemoryStore, RecordKey, RecordStore};
///
/// let mut store = MemoryStore::new();
/// store.fail_writes_to(RecordKey::Products);
/// assert!(store.write(RecordKey::Products, "[]").is_err());
/// assert!(store.write(RecordKey::Sales, "[]").is_ok());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<RecordKey, String>,
    failing: HashSet<RecordKey>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every later write to `key` fail with `StoreError::Write`.
    pub fn fail_writes_to(&mut self, key: RecordKey) {
        self.failing.insert(key);
    }

    /// Lets writes to `key` succeed again.
    pub fn heal(&mut self, key: RecordKey) {
        self.failing.remove(&key);
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: RecordKey) -> StoreResult<Option<String>> {
        Ok(self.entries.get(&key).cloned())
    }

    fn write(&mut self, key: RecordKey, contents: &str) -> StoreResult<()> {
        if self.failing.contains(&key) {
            return Err(StoreError::write(key, "quota exceeded"));
        }
        self.entries.insert(key, contents.to_string());
        Ok(())
    }

    fn remove(&mut self, key: RecordKey) -> StoreResult<()> {
        self.entries.remove(&key);
        Ok(())
    }
}

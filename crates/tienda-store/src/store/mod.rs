//! # Record Store
//!
//! Durable mapping from a record key to a serialized sequence of records.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Record Store Contract                              │
//! │                                                                         │
//! │  load::<Product>()         → Vec<Product>                               │
//! │     absent key, unreadable medium, malformed JSON → empty Vec (warn)    │
//! │                                                                         │
//! │  save(&[Product])          → Ok | StoreError::Write                     │
//! │                                                                         │
//! │  write_batch([(sales, ..), (products, ..)])                             │
//! │     write 1 ok, write 2 fails → write 1 restored → StoreError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backends only move strings: [`RecordStore`] is the byte-level trait and
//! [`RecordStoreExt`] adds the typed JSON layer on top of any backend.

pub mod file;
pub mod memory;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use tienda_core::{CashMovement, Client, Product, Sale, StoreSettings};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Record Keys
// =============================================================================

/// Every key the point of sale persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Products,
    Sales,
    Clients,
    CashMovements,
    Settings,
}

impl RecordKey {
    /// The storage key string, also the data file stem (`cashMovements.json`).
    /// `settings` holds one object with both store settings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordKey::Products => "products",
            RecordKey::Sales => "sales",
            RecordKey::Clients => "clients",
            RecordKey::CashMovements => "cashMovements",
            RecordKey::Settings => "settings",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds a record type to the key it is stored under.
pub trait Record: Serialize + DeserializeOwned {
    const KEY: RecordKey;
}

impl Record for Product {
    const KEY: RecordKey = RecordKey::Products;
}

impl Record for Sale {
    const KEY: RecordKey = RecordKey::Sales;
}

impl Record for Client {
    const KEY: RecordKey = RecordKey::Clients;
}

impl Record for CashMovement {
    const KEY: RecordKey = RecordKey::CashMovements;
}

impl Record for StoreSettings {
    const KEY: RecordKey = RecordKey::Settings;
}

// =============================================================================
// Byte-Level Contract
// =============================================================================

/// A synchronous key-value medium.
pub trait RecordStore {
    /// Raw contents under `key`, `None` if the key was never written.
    fn read(&self, key: RecordKey) -> StoreResult<Option<String>>;

    /// Replaces the contents under `key`. A failed write leaves the old
    /// contents in place.
    fn write(&mut self, key: RecordKey, contents: &str) -> StoreResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: RecordKey) -> StoreResult<()>;

    /// Writes several keys as one logical unit.
    ///
    /// Writes run in order. If one fails, every key already written is put
    /// back to its prior contents (or removed if it was absent) and the
    /// failing write's error is returned.
    fn write_batch(&mut self, entries: &[(RecordKey, String)]) -> StoreResult<()> {
        let mut previous = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            previous.push((*key, self.read(*key)?));
        }

        for (index, (key, contents)) in entries.iter().enumerate() {
            if let Err(err) = self.write(*key, contents) {
                for (written, prior) in previous[..index].iter().rev() {
                    let restored = match prior {
                        Some(prior) => self.write(*written, prior),
                        None => self.remove(*written),
                    };
                    if let Err(rollback) = restored {
                        error!(key = %written, error = %rollback, "Rollback failed");
                    }
                }
                return Err(err);
            }
        }

        Ok(())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn read(&self, key: RecordKey) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: RecordKey, contents: &str) -> StoreResult<()> {
        (**self).write(key, contents)
    }

    fn remove(&mut self, key: RecordKey) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn write_batch(&mut self, entries: &[(RecordKey, String)]) -> StoreResult<()> {
        (**self).write_batch(entries)
    }
}

// =============================================================================
// Typed Layer
// =============================================================================

/// Typed JSON load/save for any [`RecordStore`].
pub trait RecordStoreExt: RecordStore {
    /// Loads every record of type `R`. Never fails.
    fn load<R: Record>(&self) -> Vec<R> {
        self.load_value::<Vec<R>>(R::KEY).unwrap_or_default()
    }

    /// Loads a single-object record (settings), falling back to its default.
    fn load_one<R: Record + Default>(&self) -> R {
        self.load_value::<R>(R::KEY).unwrap_or_default()
    }

    /// Replaces every record of type `R`.
    fn save<R: Record>(&mut self, records: &[R]) -> StoreResult<()> {
        let contents = encode(R::KEY, records)?;
        self.write(R::KEY, &contents)
    }

    /// Replaces a single-object record.
    fn save_one<R: Record>(&mut self, record: &R) -> StoreResult<()> {
        let contents = encode(R::KEY, record)?;
        self.write(R::KEY, &contents)
    }

    /// `None` for absent, unreadable or malformed contents.
    fn load_value<T: DeserializeOwned>(&self, key: RecordKey) -> Option<T> {
        let contents = match self.read(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %key, error = %err, "Unreadable record store, using empty");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %key, error = %err, "Malformed records, using empty");
                None
            }
        }
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}

/// Serializes a value the way it is stored under `key`.
pub fn encode<T: Serialize + ?Sized>(key: RecordKey, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|err| StoreError::Serialization {
        key,
        reason: err.to_string(),
    })
}

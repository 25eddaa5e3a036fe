//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the record key                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PosError ← StoreError | CoreError from a Register operation            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in terminal app) ← code + message for the cashier            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use tienda_core::{CoreError, ValidationError};

use crate::store::RecordKey;

/// Record store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The medium rejected a write (disk full, permissions, quota).
    ///
    /// ## When This Occurs
    /// - Temp file cannot be created or renamed
    /// - A test store was told to fail this key
    #[error("Could not save {key}: {reason}")]
    Write { key: RecordKey, reason: String },

    /// The medium could not be read at all (not: the key is absent).
    #[error("Could not read {key}: {reason}")]
    Read { key: RecordKey, reason: String },

    /// Records could not be encoded as JSON.
    #[error("Could not encode {key}: {reason}")]
    Serialization { key: RecordKey, reason: String },

    /// The data directory could not be created.
    #[error("Could not open data directory {path}: {reason}")]
    Open { path: String, reason: String },
}

impl StoreError {
    /// Creates a Write error for a key.
    pub fn write(key: RecordKey, reason: impl ToString) -> Self {
        StoreError::Write {
            key,
            reason: reason.to_string(),
        }
    }

    /// Creates a Read error for a key.
    pub fn read(key: RecordKey, reason: impl ToString) -> Self {
        StoreError::Read {
            key,
            reason: reason.to_string(),
        }
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Anything a [`crate::Register`] operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PosError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::Core(CoreError::Validation(err))
    }
}

/// Result type for register operations.
pub type PosResult<T> = Result<T, PosError>;

//! # API Error Type
//!
//! Unified error type for shell commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tienda POS                             │
//! │                                                                         │
//! │  tienda> add X1                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::Write { .. } ───────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Domain Error? ─── CoreError::OutOfStock ──────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  error [OUT_OF_STOCK]: Out of stock: X1        (text mode)              │
//! │  {"code":"OUT_OF_STOCK","message":"..."}       (--json mode)            │
//! │                                                                         │
//! │  The shell prints the error and keeps running.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tienda_core::{CoreError, ValidationError};
use tienda_store::{PosError, StoreError};

/// API error returned from shell commands.
///
/// ## Serialization
/// This is what a `--json` consumer receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: X9"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The product has no live stock to reserve
    OutOfStock,

    /// A stock change would go below zero or below what the cart holds
    InsufficientStock,

    /// Checkout with nothing in the cart
    EmptyCart,

    /// The record store could not be written
    StorageError,

    /// Resource not found
    NotFound,

    /// Input validation failed (bad amount, unknown flag, ...)
    ValidationError,

    /// Business rule refused the operation
    BusinessLogic,

    /// Internal error (serialization of a response)
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OutOfStock => "OUT_OF_STOCK",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::EmptyCart => "EMPTY_CART",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::ProductNotFound(_)
            | CoreError::ClientNotFound(_)
            | CoreError::SaleNotFound(_) => ErrorCode::NotFound,
            CoreError::DuplicateSku(_) | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::ProductReserved { .. } | CoreError::NonPositiveContribution => {
                ErrorCode::BusinessLogic
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the full cause; the cashier sees a short message.
        tracing::error!(error = %err, "Record store failure");
        ApiError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<PosError> for ApiError {
    fn from(err: PosError) -> Self {
        match err {
            PosError::Core(err) => err.into(),
            PosError::Store(err) => err.into(),
        }
    }
}

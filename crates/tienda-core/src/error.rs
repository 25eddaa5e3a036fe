//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tienda-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tienda-store errors (separate crate)                                  │
//! │  ├── StoreError       - Record store write failures                    │
//! │  └── PosError         - CoreError | StoreError from Register calls     │
//! │                                                                         │
//! │  Terminal errors (in app)                                              │
//! │  └── ApiError         - What the cashier sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → PosError → ApiError → Terminal    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is a recoverable, user-visible condition. None of them
//! poisons the in-memory state: an operation that returns an error has not
//! mutated anything.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No product carries this SKU.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A unit cannot be added to the cart.
    ///
    /// ## When This Occurs
    /// - The product's live stock is zero (sold out or fully reserved)
    /// - The SKU does not exist in the catalog
    ///
    /// ## User Workflow
    /// ```text
    /// Click product card (stock: 0)
    ///      │
    ///      ▼
    /// add_unit("X1")
    ///      │
    ///      ▼
    /// OutOfStock { sku: "X1" }
    ///      │
    ///      ▼
    /// UI shows: "X1 is out of stock"
    /// ```
    #[error("Out of stock: {sku}")]
    OutOfStock { sku: String },

    /// A stock decrement would take the counter below zero.
    ///
    /// Unreachable through the cart (which checks `OutOfStock` first) but
    /// enforced by the ledger itself.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: u32,
        requested: u32,
    },

    /// Finalize was called with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The SKU is already used by another product.
    #[error("A product with SKU {0} already exists")]
    DuplicateSku(String),

    /// The product has units sitting in the cart.
    #[error("Product {sku} has {reserved} unit(s) in the cart")]
    ProductReserved { sku: String, reserved: u32 },

    /// No client with this id.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Sale not found in the ledger.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Break-even is undefined when each unit sold loses money.
    #[error("Unit price must exceed unit variable cost to reach break-even")]
    NonPositiveContribution,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparsable amount, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate DNI).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

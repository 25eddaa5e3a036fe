//! # Validation Module
//!
//! Input validation utilities for Tienda POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell / renderer                                             │
//! │  ├── Parsing (amounts, percentages, integers)                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: Business rule validation                        │
//! │  ├── Required fields, lengths, formats                                 │
//! │  └── Sign checks on money                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger / registry                                            │
//! │  ├── SKU and DNI uniqueness                                            │
//! │  └── Stock never below zero                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::validation::{normalize_sku, validate_sku};
//!
//! validate_sku("gas-500").unwrap();
//! assert_eq!(normalize_sku(" gas-500 "), "GAS-500");
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest restock accepted in a single operation.
pub const MAX_RESTOCK_QUANTITY: u32 = 100_000;

/// Largest stock (and minimum stock) a product may hold.
pub const MAX_STOCK: u32 = 1_000_000;

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use tienda_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Canonical SKU form: trimmed and uppercase.
///
/// Every lookup goes through this, so `x1`, ` X1` and `X1` address the same
/// product.
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 200)
}

/// Validates a search query and returns it trimmed.
///
/// Empty is allowed (matches everything); at most 100 characters.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a restock quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_RESTOCK_QUANTITY`]
pub fn validate_restock_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_RESTOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_RESTOCK_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a stock count against [`MAX_STOCK`].
pub fn validate_stock(field: &str, units: u32) -> ValidationResult<()> {
    if units > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_STOCK as i64,
        });
    }

    Ok(())
}

/// Validates that an amount is zero or more and at most [`Money::MAX`]
/// (costs, prices).
///
/// ## Example
/// ```rust
/// use tienda_core::money::Money;
/// use tienda_core::validation::validate_non_negative_money;
///
/// assert!(validate_non_negative_money("cost", Money::zero()).is_ok());
/// assert!(validate_non_negative_money("cost", Money::from_cents(-100)).is_err());
/// assert!(validate_non_negative_money("cost", Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_non_negative_money(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() || amount > Money::MAX {
        return Err(money_out_of_range(field, 0));
    }

    Ok(())
}

/// Validates that an amount is strictly positive and at most
/// [`Money::MAX`] (cash movements).
pub fn validate_positive_money(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if amount > Money::MAX {
        return Err(money_out_of_range(field, 1));
    }

    Ok(())
}

fn money_out_of_range(field: &str, min: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min,
        max: Money::MAX.cents(),
    }
}

// =============================================================================
// Client Validators
// =============================================================================

/// Validates a DNI (national identity document number).
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Letters and digits only
pub fn validate_dni(dni: &str) -> ValidationResult<()> {
    let dni = dni.trim();
    validate_required_text("dni", dni, 20)?;

    if !dni.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "dni".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a client name (required, at most 200 characters).
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 200)
}

/// Validates an optional email address.
///
/// Only checks for a non-leading `@` with something after it; real
/// verification is the mail server's job.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

// =============================================================================
// Settings Validators
// =============================================================================

/// Validates a setting value (store name, currency symbol).
pub fn validate_setting(field: &str, value: &str) -> ValidationResult<String> {
    validate_required_text(field, value, 80)?;
    Ok(value.trim().to_string())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use tienda_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # tienda-store: Persistence Layer for Tienda POS
//!
//! This crate provides the record store the point of sale persists to, and
//! the [`Register`]: the context object that owns the inventory ledger, the
//! cart session and every other collection for one running process.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda POS Data Flow                             │
//! │                                                                         │
//! │  Shell command (checkout)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tienda-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Register    │    │ RecordStore   │    │   Backends   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ ledger, cart  │───►│ load / save   │───►│ JsonFileStore│  │   │
//! │  │   │ finalize()    │    │ write_batch   │    │ MemoryStore  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   <data dir>/products.json  sales.json  clients.json  ...       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Record store contract, record keys and both backends
//! - [`register`] - The register context and the sale finalizer
//! - [`error`] - Store and register error types
//!
//! ## Usage
//!
//! ```rust
//! use tienda_core::{Margin, Money, ProductDraft};
//! use tienda_store::{MemoryStore, Register};
//!
//! let mut register = Register::open(MemoryStore::new());
//! register
//!     .add_product(ProductDraft::new("X1", "Gaseosa", Money::from_cents(1000), Margin::from_percent(50), 5, 1))
//!     .unwrap();
//!
//! register.add_to_cart("X1").unwrap();
//! register.add_to_cart("X1").unwrap();
//! let sale = register.finalize().unwrap();
//!
//! assert_eq!(sale.total.cents(), 4177);
//! assert!(register.cart().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod register;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{PosError, PosResult, StoreError, StoreResult};
pub use register::Register;
pub use store::file::JsonFileStore;
pub use store::memory::MemoryStore;
pub use store::{Record, RecordKey, RecordStore, RecordStoreExt};

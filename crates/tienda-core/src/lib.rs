//! # tienda-core: Pure Business Logic for Tienda POS
//!
//! This crate is the **heart** of Tienda POS. It holds the catalog, the
//! stock-reserving cart and every calculation the back office shows, as
//! plain data structures with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Terminal shell / browser renderer               │   │
//! │  │    Product grid ──► Cart ──► Checkout ──► Sales history         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ method calls                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tienda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   cart    │  │  reports  │  │ validation│  │   │
//! │  │   │  Ledger   │◄─│  Session  │  │   KPIs    │  │   rules   │  │   │
//! │  │   │  stock    │  │ reserve   │  │  charts   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TERMINAL • PLAIN DATA                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tienda-store (Persistence Layer)                │   │
//! │  │          Record store, repositories, sale finalizer             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Client, CashMovement, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Sale price derivation from cost and margin
//! - [`inventory`] - The Inventory Ledger (authoritative stock counters)
//! - [`cart`] - The Cart Session and its reserve-on-add policy
//! - [`events`] - Stock and sale notifications for observers
//! - [`clients`] - Client registry
//! - [`cash`] - Cash-flow book
//! - [`reports`] - Dashboard KPIs and chart series
//! - [`tools`] - Break-even and profit simulation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tienda_core::{CartSession, InventoryLedger, Margin, Money, ProductDraft};
//!
//! let mut ledger = InventoryLedger::default();
//! ledger
//!     .insert(ProductDraft::new("x1", "Gaseosa", Money::from_cents(1000), Margin::from_percent(50), 5, 1).build().unwrap())
//!     .unwrap();
//!
//! let mut cart = CartSession::new();
//! cart.add_unit(&mut ledger, "X1").unwrap();
//! cart.add_unit(&mut ledger, "X1").unwrap();
//!
//! let totals = cart.totals();
//! assert_eq!(totals.subtotal.cents(), 3540);
//! assert_eq!(totals.tax.cents(), 637);
//! assert_eq!(totals.total.cents(), 4177);
//! assert_eq!(ledger.find_by_sku("X1").unwrap().stock, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod cash;
pub mod clients;
pub mod error;
pub mod events;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod reports;
pub mod tools;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartSession, CartTotals};
pub use cash::{CashBook, CashSummary};
pub use clients::ClientRegistry;
pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{DomainEvent, EventBus, SubscriptionId};
pub use inventory::InventoryLedger;
pub use money::Money;
pub use pricing::{derive_price, derive_price_from_input};
pub use reports::{DailySales, Dashboard, DashboardKpis, MonthlyProfit};
pub use tools::{BreakEven, ProfitOutcome, ProfitSimulation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every cart and baked into derived prices (IGV, 18%).
pub const IGV_RATE: TaxRate = TaxRate::from_bps(1800);

/// Prefix of generated sale identifiers (`SALE-<unix millis>`).
pub const SALE_ID_PREFIX: &str = "SALE";

/// Default store name until the owner sets one.
pub const DEFAULT_STORE_NAME: &str = "Mi Tienda";

/// Default currency symbol (Peruvian sol).
pub const DEFAULT_CURRENCY_SYMBOL: &str = "S/.";

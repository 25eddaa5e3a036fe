//! # Inventory Ledger
//!
//! Single source of truth for product stock counts during a session.
//!
//! ## Stock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Live Stock Counter                               │
//! │                                                                         │
//! │  Record store (durable stock) ──load──► InventoryLedger                 │
//! │                                             │                           │
//! │            CartSession::add_unit ──take 1──►│                           │
//! │            CartSession::remove_line ◄─put back qty                      │
//! │            CartSession::clear ◄──────put back all                       │
//! │            restock / edit ─────────────────►│                           │
//! │                                             │                           │
//! │                     every change ──► EventBus (StockChanged)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is `u32`; a decrement that would cross zero fails with
//! `InsufficientStock` and leaves the counter untouched.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::events::{DomainEvent, EventBus};
use crate::types::Product;
use crate::validation::{
    normalize_sku, validate_non_negative_money, validate_restock_quantity, validate_stock,
    ValidationResult, MAX_STOCK,
};

/// The authoritative in-memory product list.
#[derive(Debug)]
pub struct InventoryLedger {
    products: Vec<Product>,
    events: Rc<EventBus>,
}

impl Default for InventoryLedger {
    fn default() -> Self {
        InventoryLedger::new(Vec::new(), EventBus::shared())
    }
}

impl InventoryLedger {
    /// Builds a ledger from loaded products.
    ///
    /// Records with a SKU already seen are dropped (first one wins), so a
    /// hand-edited data file cannot break SKU uniqueness. So are records
    /// whose stock or amounts fall outside the accepted ranges.
    pub fn new(products: Vec<Product>, events: Rc<EventBus>) -> Self {
        let mut unique: Vec<Product> = Vec::with_capacity(products.len());
        for mut product in products {
            product.sku = normalize_sku(&product.sku);
            if unique.iter().any(|p| p.sku == product.sku) {
                warn!(sku = %product.sku, "Dropping duplicate product record");
                continue;
            }
            if let Err(err) = validate_loaded(&product) {
                warn!(sku = %product.sku, error = %err, "Dropping out-of-range product record");
                continue;
            }
            unique.push(product);
        }

        InventoryLedger {
            products: unique,
            events,
        }
    }

    /// The bus this ledger publishes `StockChanged` on.
    pub fn events(&self) -> &Rc<EventBus> {
        &self.events
    }

    /// All products, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product; the SKU is normalized first.
    pub fn find_by_sku(&self, sku: &str) -> Option<&Product> {
        let sku = normalize_sku(sku);
        self.products.iter().find(|p| p.sku == sku)
    }

    /// Removes `qty` units from a product's stock.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the SKU is unknown
    /// - `InsufficientStock` if `qty` exceeds current stock
    pub fn decrement_stock(&mut self, sku: &str, qty: u32) -> CoreResult<u32> {
        let stock = self.take(sku, qty)?;
        self.notify_stock(sku);
        Ok(stock)
    }

    /// Adds `qty` units back to a product's stock.
    ///
    /// No upper bound is enforced: callers releasing a reservation must only
    /// return what they took.
    pub fn increment_stock(&mut self, sku: &str, qty: u32) -> CoreResult<u32> {
        let stock = self.put_back(sku, qty)?;
        self.notify_stock(sku);
        Ok(stock)
    }

    /// Receives new merchandise into stock.
    ///
    /// ## Errors
    /// `Validation` if `qty` is out of range or the new stock would exceed
    /// [`MAX_STOCK`]. Stock is left unchanged.
    pub fn restock(&mut self, sku: &str, qty: u32) -> CoreResult<u32> {
        validate_restock_quantity(qty)?;
        let current = self.index_of(sku).map(|index| self.products[index].stock)?;
        validate_stock("stock", current.saturating_add(qty))?;
        let stock = self.increment_stock(sku, qty)?;
        debug!(sku = %normalize_sku(sku), qty, stock, "Restocked product");
        Ok(stock)
    }

    /// Adds a new product to the catalog.
    pub fn insert(&mut self, product: Product) -> CoreResult<()> {
        if self.find_by_sku(&product.sku).is_some() {
            return Err(CoreError::DuplicateSku(product.sku));
        }

        let sku = product.sku.clone();
        self.products.push(product);
        self.notify_stock(&sku);
        Ok(())
    }

    /// Replaces a product in place, keeping its catalog position and SKU.
    pub fn replace(&mut self, sku: &str, mut product: Product) -> CoreResult<&Product> {
        let index = self.index_of(sku)?;
        product.sku = self.products[index].sku.clone();
        self.products[index] = product;
        self.notify_stock(sku);
        Ok(&self.products[index])
    }

    /// Removes a product from the catalog.
    pub fn remove(&mut self, sku: &str) -> CoreResult<Product> {
        let index = self.index_of(sku)?;
        let product = self.products.remove(index);
        self.events.emit(&DomainEvent::ProductRemoved {
            sku: product.sku.clone(),
        });
        Ok(product)
    }

    /// Case-insensitive substring search on name or SKU.
    ///
    /// An empty (or blank) query returns every product.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.sku.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Products at or below their minimum stock.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_low_stock()).collect()
    }

    // -------------------------------------------------------------------------
    // Silent mutations
    // -------------------------------------------------------------------------
    // The cart changes stock and its own lines as one step; it mutates through
    // these and notifies once both sides agree.

    pub(crate) fn take(&mut self, sku: &str, qty: u32) -> CoreResult<u32> {
        let index = self.index_of(sku)?;
        let product = &mut self.products[index];

        let remaining = product
            .stock
            .checked_sub(qty)
            .ok_or_else(|| CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock,
                requested: qty,
            })?;

        product.stock = remaining;
        Ok(remaining)
    }

    pub(crate) fn put_back(&mut self, sku: &str, qty: u32) -> CoreResult<u32> {
        let index = self.index_of(sku)?;
        let product = &mut self.products[index];
        product.stock = product
            .stock
            .checked_add(qty)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: MAX_STOCK as i64,
            })?;
        Ok(product.stock)
    }

    pub(crate) fn notify_stock(&self, sku: &str) {
        if let Some(product) = self.find_by_sku(sku) {
            self.events.emit(&DomainEvent::StockChanged {
                sku: product.sku.clone(),
                stock: product.stock,
            });
        }
    }

    fn index_of(&self, sku: &str) -> CoreResult<usize> {
        let sku = normalize_sku(sku);
        self.products
            .iter()
            .position(|p| p.sku == sku)
            .ok_or(CoreError::ProductNotFound(sku))
    }
}

/// Range checks for a product read back from storage.
fn validate_loaded(product: &Product) -> ValidationResult<()> {
    validate_stock("stock", product.stock)?;
    validate_stock("min stock", product.min_stock)?;
    validate_non_negative_money("cost", product.cost)?;
    validate_non_negative_money("price", product.price)
}

// =============================================================================
// Unit Tests
// =============================================================================

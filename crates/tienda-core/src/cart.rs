//! # Cart Session
//!
//! The in-progress transaction and its reserve-on-add policy.
//!
//! ## Reservation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reserve-on-Add                                     │
//! │                                                                         │
//! │  add_unit(sku) ────► ledger stock -1, line quantity +1                  │
//! │                                                                         │
//! │  remove_line(sku) ─► ledger stock +qty, line deleted                    │
//! │                                                                         │
//! │  clear() ──────────► ledger stock +qty for every line, lines emptied    │
//! │                      (observers are notified only after both sides      │
//! │                       are consistent)                                   │
//! │                                                                         │
//! │  consume() ────────► lines emptied, stock NOT restored                  │
//! │                      (the sale now owns the units)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! For every SKU, `reserved(sku) + ledger stock(sku)` equals the stock the
//! ledger held when the session began.
//!
//! The cart is never persisted. An abandoned session leaks its reservations
//! only in memory; reloading from the record store recovers them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::InventoryLedger;
use crate::money::Money;
use crate::types::{CartLine, Sale, SaleLine};
use crate::validation::normalize_sku;
use crate::IGV_RATE;

/// Cart totals, recomputed from lines on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Σ price × quantity.
    pub subtotal: Money,
    /// IGV on the subtotal, rounded half up.
    pub tax: Money,
    /// subtotal + tax.
    pub total: Money,
    /// Distinct lines.
    pub item_count: usize,
    /// Units across all lines.
    pub unit_count: u32,
}

/// The single, transient shopping cart of a running register.
#[derive(Debug, Default, Clone)]
pub struct CartSession {
    lines: Vec<CartLine>,
}

impl CartSession {
    /// Creates an empty cart.
    pub fn new() -> Self {
        CartSession::default()
    }

    /// Cart lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units of `sku` currently held by the cart (0 if none).
    pub fn reserved(&self, sku: &str) -> u32 {
        let sku = normalize_sku(sku);
        self.lines
            .iter()
            .find(|line| line.sku == sku)
            .map_or(0, |line| line.quantity)
    }

    /// Reserves one unit of `sku` and adds it to the cart.
    ///
    /// A new line snapshots the product's name, price and cost. An existing
    /// line keeps its snapshot and only grows its quantity.
    ///
    /// ## Errors
    /// - `OutOfStock` when the product is unknown or has no live stock
    /// - `Validation` when the subtotal would exceed [`Money::MAX`]
    ///
    /// Nothing is mutated in either case.
    pub fn add_unit(&mut self, ledger: &mut InventoryLedger, sku: &str) -> CoreResult<&CartLine> {
        let sku = normalize_sku(sku);
        let product = match ledger.find_by_sku(&sku) {
            Some(product) if product.stock > 0 => product.clone(),
            _ => return Err(CoreError::OutOfStock { sku }),
        };

        let unit_price = self
            .lines
            .iter()
            .find(|line| line.sku == sku)
            .map_or(product.price, |line| line.price);
        let subtotal = self.totals().subtotal.checked_add(unit_price);
        if !subtotal.is_some_and(|subtotal| subtotal <= Money::MAX) {
            return Err(ValidationError::OutOfRange {
                field: "cart subtotal".to_string(),
                min: 0,
                max: Money::MAX.cents(),
            }
            .into());
        }

        ledger.take(&sku, 1)?;

        let index = match self.lines.iter().position(|line| line.sku == sku) {
            Some(index) => {
                self.lines[index].quantity += 1;
                index
            }
            None => {
                self.lines.push(CartLine::from_product(&product));
                self.lines.len() - 1
            }
        };

        ledger.notify_stock(&sku);
        debug!(sku = %sku, quantity = self.lines[index].quantity, "Reserved unit");
        Ok(&self.lines[index])
    }

    /// Removes a line and returns its units to the ledger.
    ///
    /// Silently does nothing (returns `None`) if the cart has no such line.
    pub fn remove_line(&mut self, ledger: &mut InventoryLedger, sku: &str) -> Option<CartLine> {
        let sku = normalize_sku(sku);
        let index = self.lines.iter().position(|line| line.sku == sku)?;
        let line = self.lines.remove(index);

        // The product may have been deleted meanwhile; nothing to restore then.
        if ledger.put_back(&line.sku, line.quantity).is_ok() {
            ledger.notify_stock(&line.sku);
        }

        debug!(sku = %line.sku, quantity = line.quantity, "Released line");
        Some(line)
    }

    /// Releases every reservation and empties the cart.
    ///
    /// All stock is restored and all lines dropped before the first
    /// `StockChanged` goes out, so no observer sees a half-cleared cart.
    pub fn clear(&mut self, ledger: &mut InventoryLedger) {
        let released: Vec<CartLine> = self.lines.drain(..).collect();
        let restored: Vec<&CartLine> = released
            .iter()
            .filter(|line| ledger.put_back(&line.sku, line.quantity).is_ok())
            .collect();

        for line in &restored {
            ledger.notify_stock(&line.sku);
        }

        debug!(lines = released.len(), "Cleared cart");
    }

    /// Subtotal, tax and total from the current lines. Pure read.
    pub fn totals(&self) -> CartTotals {
        let subtotal: Money = self.lines.iter().map(CartLine::line_total).sum();
        let tax = subtotal.calculate_tax(IGV_RATE);

        CartTotals {
            subtotal,
            tax,
            total: subtotal + tax,
            item_count: self.lines.len(),
            unit_count: self.lines.iter().map(|line| line.quantity).sum(),
        }
    }

    /// Builds the sale this cart would become, without touching the cart.
    ///
    /// `total` comes from [`CartSession::totals`] and `cost` is the sum of
    /// line costs; neither is ever read back from rendered text.
    pub fn build_sale(&self, id: String, date: DateTime<Utc>) -> CoreResult<Sale> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(Sale {
            id,
            date,
            total: self.totals().total,
            cost: self.lines.iter().map(CartLine::line_cost).sum(),
            items: self.lines.iter().map(SaleLine::from).collect(),
        })
    }

    /// Empties the cart without restoring stock.
    ///
    /// Only the sale finalizer calls this, once the sale has been persisted.
    pub fn consume(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DomainEvent, EventBus};
    use crate::types::{Margin, Product, ProductDraft};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn product(sku: &str, cost: i64, stock: u32) -> Product {
        ProductDraft::new(sku, format!("Producto {}", sku), Money::from_cents(cost), Margin::from_percent(50), stock, 1)
            .build()
            .unwrap()
    }

    fn ledger() -> InventoryLedger {
        InventoryLedger::new(
            vec![product("X1", 1000, 5), product("Y2", 250, 2), product("Z3", 400, 0)],
            EventBus::shared(),
        )
    }

    fn stock(ledger: &InventoryLedger, sku: &str) -> u32 {
        ledger.find_by_sku(sku).unwrap().stock
    }

    #[test]
    fn test_add_unit_reserves_stock() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();

        cart.add_unit(&mut ledger, "X1").unwrap();
        let line = cart.add_unit(&mut ledger, "x1").unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(stock(&ledger, "X1"), 3);
        assert_eq!(cart.reserved("X1"), 2);
    }

    #[test]
    fn test_scenario_totals() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "X1").unwrap();
        cart.add_unit(&mut ledger, "X1").unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal.cents(), 3540);
        assert_eq!(totals.tax.cents(), 637);
        assert_eq!(totals.total.cents(), 4177);
        assert_eq!(totals.unit_count, 2);
    }

    #[test]
    fn test_add_unit_out_of_stock_does_not_mutate() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();

        let err = cart.add_unit(&mut ledger, "Z3").unwrap_err();
        assert_eq!(err, CoreError::OutOfStock { sku: "Z3".to_string() });
        assert!(cart.is_empty());
        assert_eq!(stock(&ledger, "Z3"), 0);

        let err = cart.add_unit(&mut ledger, "missing").unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
    }

    #[test]
    fn test_add_unit_stops_when_fully_reserved() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "Y2").unwrap();
        cart.add_unit(&mut ledger, "Y2").unwrap();

        assert!(cart.add_unit(&mut ledger, "Y2").is_err());
        assert_eq!(cart.reserved("Y2"), 2);
    }

    #[test]
    fn test_add_unit_refuses_subtotal_beyond_limit() {
        // 400,000,000.00 × 1.18 = 472,000,000.00 per unit
        let pricey = ProductDraft::new("LINGOTE", "Lingote", Money::from_cents(40_000_000_000), Margin::default(), 5, 0)
            .build()
            .unwrap();
        let mut ledger = InventoryLedger::new(vec![pricey], EventBus::shared());
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "LINGOTE").unwrap();
        cart.add_unit(&mut ledger, "LINGOTE").unwrap();

        let err = cart.add_unit(&mut ledger, "LINGOTE").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(cart.reserved("LINGOTE"), 2);
        assert_eq!(stock(&ledger, "LINGOTE"), 3);
        assert_eq!(cart.totals().subtotal.cents(), 94_400_000_000);
    }

    #[test]
    fn test_remove_line_restores_exactly() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        for _ in 0..3 {
            cart.add_unit(&mut ledger, "X1").unwrap();
        }

        let removed = cart.remove_line(&mut ledger, "X1").unwrap();
        assert_eq!(removed.quantity, 3);
        assert_eq!(stock(&ledger, "X1"), 5);
        assert_eq!(cart.reserved("X1"), 0);
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "X1").unwrap();

        assert!(cart.remove_line(&mut ledger, "Y2").is_none());
        assert_eq!(stock(&ledger, "Y2"), 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear_zeroes_totals_and_restores() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "X1").unwrap();
        cart.add_unit(&mut ledger, "Y2").unwrap();

        cart.clear(&mut ledger);

        let totals = cart.totals();
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax.is_zero());
        assert!(totals.total.is_zero());
        assert_eq!(stock(&ledger, "X1"), 5);
        assert_eq!(stock(&ledger, "Y2"), 2);
    }

    #[test]
    fn test_clear_notifies_after_everything_is_restored() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "X1").unwrap();
        cart.add_unit(&mut ledger, "Y2").unwrap();

        // Every notification must already see both products fully restored.
        let observed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&observed);
        ledger.events().subscribe(move |event| {
            if let DomainEvent::StockChanged { sku, stock } = event {
                sink.borrow_mut().push((sku.clone(), *stock));
            }
        });

        cart.clear(&mut ledger);
        assert_eq!(
            *observed.borrow(),
            vec![("X1".to_string(), 5), ("Y2".to_string(), 2)]
        );
    }

    #[test]
    fn test_build_sale() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        assert_eq!(
            cart.build_sale("SALE-1".to_string(), Utc::now()).unwrap_err(),
            CoreError::EmptyCart
        );

        cart.add_unit(&mut ledger, "X1").unwrap();
        cart.add_unit(&mut ledger, "X1").unwrap();

        let sale = cart.build_sale("SALE-1".to_string(), Utc::now()).unwrap();
        assert_eq!(sale.total.cents(), 4177);
        assert_eq!(sale.cost.cents(), 2000);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(cart.lines().len(), 1, "building a sale leaves the cart intact");
    }

    #[test]
    fn test_consume_keeps_stock_consumed() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "X1").unwrap();

        let lines = cart.consume();
        assert_eq!(lines.len(), 1);
        assert!(cart.is_empty());
        assert_eq!(stock(&ledger, "X1"), 4);
    }

    #[test]
    fn test_line_snapshot_survives_catalog_edit() {
        let mut ledger = ledger();
        let mut cart = CartSession::new();
        cart.add_unit(&mut ledger, "X1").unwrap();

        let mut edited = product("X1", 5000, 4);
        edited.name = "Renamed".to_string();
        ledger.replace("X1", edited).unwrap();
        cart.add_unit(&mut ledger, "X1").unwrap();

        let line = &cart.lines()[0];
        assert_eq!(line.name, "Producto X1");
        assert_eq!(line.price.cents(), 1770);
        assert_eq!(line.quantity, 2);
    }

    // -------------------------------------------------------------------------
    // Reservation invariant
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Remove(usize),
        Clear,
    }

    const SKUS: [&str; 3] = ["X1", "Y2", "Z3"];

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0..SKUS.len()).prop_map(Op::Add),
            2 => (0..SKUS.len()).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn test_reserved_plus_stock_is_constant(ops in prop::collection::vec(op(), 0..60)) {
            let mut ledger = ledger();
            let initial: Vec<u32> = SKUS.iter().map(|sku| stock(&ledger, sku)).collect();
            let mut cart = CartSession::new();

            for op in ops {
                match op {
                    Op::Add(i) => {
                        let before = stock(&ledger, SKUS[i]);
                        let result = cart.add_unit(&mut ledger, SKUS[i]);
                        prop_assert_eq!(result.is_err(), before == 0);
                    }
                    Op::Remove(i) => {
                        cart.remove_line(&mut ledger, SKUS[i]);
                    }
                    Op::Clear => cart.clear(&mut ledger),
                }

                for (i, sku) in SKUS.iter().enumerate() {
                    prop_assert_eq!(cart.reserved(sku) + stock(&ledger, sku), initial[i]);
                }
            }
        }
    }
}

//! # Checkout
//!
//! Cart operations and the sale finalizer.
//!
//! ## Finalize Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         finalize()                                      │
//! │                                                                         │
//! │  1. cart.build_sale(id, now)      EmptyCart? → error, nothing changed   │
//! │  2. write_batch([                                                       │
//! │        sales    ← ledger + new sale,                                    │
//! │        products ← live stock (reservations become consumption) ])       │
//! │          │                                                              │
//! │          ├── fails → sales.json restored, cart intact, sale not added   │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  3. sales.push(sale), cart.consume()   (stock is NOT restored)          │
//! │  4. emit SaleFinalized                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is never decremented here; `add_to_cart` already did it.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use tienda_core::{CartLine, CartTotals, CoreError, DomainEvent, Sale, SALE_ID_PREFIX};

use super::Register;
use crate::error::PosResult;
use crate::store::{encode, RecordKey, RecordStore};

impl<S: RecordStore> Register<S> {
    /// Reserves one unit and returns the updated cart line.
    ///
    /// ## Errors
    /// `OutOfStock` if the product is unknown or has no live stock.
    pub fn add_to_cart(&mut self, sku: &str) -> PosResult<CartLine> {
        let line = self.cart.add_unit(&mut self.ledger, sku)?;
        Ok(line.clone())
    }

    /// Drops a cart line, releasing its units. No-op for an absent line.
    pub fn remove_from_cart(&mut self, sku: &str) -> Option<CartLine> {
        self.cart.remove_line(&mut self.ledger, sku)
    }

    /// Releases every reservation.
    pub fn clear_cart(&mut self) {
        self.cart.clear(&mut self.ledger);
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Converts the cart into a persisted sale.
    ///
    /// ## Errors
    /// - `EmptyCart` with no lines (sales ledger unchanged)
    /// - `Store` if either write fails; the cart stays intact and the sale
    ///   is not appended, so the checkout can simply be retried
    pub fn finalize(&mut self) -> PosResult<Sale> {
        let date = Utc::now();
        let (id, millis) = self.next_sale_id(date);
        let sale = self.cart.build_sale(id, date)?;

        let mut sales = self.sales.clone();
        sales.push(sale.clone());
        let batch = [
            (RecordKey::Sales, encode(RecordKey::Sales, &sales)?),
            (RecordKey::Products, encode(RecordKey::Products, self.ledger.products())?),
        ];

        if let Err(err) = self.store.write_batch(&batch) {
            warn!(sale_id = %sale.id, error = %err, "Checkout not saved, cart kept");
            return Err(err.into());
        }

        self.sales = sales;
        self.last_sale_millis = millis;
        let lines = self.cart.consume();

        info!(
            sale_id = %sale.id,
            total = %sale.total,
            lines = lines.len(),
            units = sale.unit_count(),
            "Sale finalized"
        );
        self.events.emit(&DomainEvent::SaleFinalized {
            sale_id: sale.id.clone(),
            total: sale.total,
        });

        Ok(sale)
    }

    /// Sales in the order they were made.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn find_sale(&self, id: &str) -> PosResult<&Sale> {
        let id = id.trim();
        self.sales
            .iter()
            .find(|sale| sale.id == id)
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()).into())
    }

    /// `SALE-<millis>`, bumped past the last issued id if the clock has not
    /// moved forward.
    fn next_sale_id(&self, now: DateTime<Utc>) -> (String, i64) {
        let millis = now.timestamp_millis().max(self.last_sale_millis.saturating_add(1));
        debug!(millis, "Issued sale id");
        (format!("{}-{}", SALE_ID_PREFIX, millis), millis)
    }
}

//! # Sale Commands
//!
//! Checkout and the sales history.
//!
//! ## Checkout Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tienda> checkout                                                       │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  Register::finalize()                                          │    │
//! │  │  1. Build sale from cart (EMPTY_CART if nothing to sell)       │    │
//! │  │  2. Save sales + products together (STORAGE_ERROR rolls back)  │    │
//! │  │  3. Empty the cart without restoring stock                     │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  Receipt printed; on STORAGE_ERROR the cart is still there to retry     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use tienda_core::{Sale, StoreSettings};
use tienda_store::{RecordStore, Register};

use super::{fit, Render};
use crate::error::ApiError;

/// One sale with its lines (receipt).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub sale: Sale,
}

impl Render for SaleResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        let sale = &self.sale;
        let mut out = format!(
            "{}\n{}  {}\n",
            settings.store_name,
            sale.id,
            sale.date.format("%Y-%m-%d %H:%M")
        );
        for line in &sale.items {
            out.push_str(&format!(
                "  {:<24} x{:<4} {:>12}\n",
                fit(&line.name, 24),
                line.quantity,
                settings.format_currency(line.price * line.quantity)
            ));
        }
        out.push_str(&format!(
            "  {:<30} {:>12}",
            "TOTAL (IGV incl.)",
            settings.format_currency(sale.total)
        ));
        out
    }
}

/// Sales history, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesResponse {
    pub sales: Vec<Sale>,
}

impl Render for SalesResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        if self.sales.is_empty() {
            return "No sales yet".to_string();
        }
        self.sales
            .iter()
            .map(|sale| {
                format!(
                    "{:<20} {}  {:>4} units  {:>12}",
                    sale.id,
                    sale.date.format("%Y-%m-%d %H:%M"),
                    sale.unit_count(),
                    settings.format_currency(sale.total)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Turns the cart into a sale.
pub fn checkout<S: RecordStore>(register: &mut Register<S>) -> Result<SaleResponse, ApiError> {
    debug!(lines = register.cart().lines().len(), "checkout command");
    let sale = register.finalize()?;
    Ok(SaleResponse { sale })
}

pub fn list_sales<S: RecordStore>(register: &Register<S>) -> SalesResponse {
    debug!("list_sales command");
    SalesResponse {
        sales: register.sales().iter().rev().cloned().collect(),
    }
}

pub fn get_sale<S: RecordStore>(register: &Register<S>, id: &str) -> Result<SaleResponse, ApiError> {
    debug!(sale_id = %id, "get_sale command");
    let sale = register.find_sale(id)?.clone();
    Ok(SaleResponse { sale })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tienda_core::{Margin, Money, ProductDraft};
    use tienda_store::{MemoryStore, RecordKey};

    fn register() -> Register<MemoryStore> {
        let mut register = Register::open(MemoryStore::new());
        register
            .add_product(ProductDraft::new(
                "X1",
                "Gaseosa 500ml",
                Money::from_cents(1000),
                Margin::from_percent(50),
                5,
                1,
            ))
            .unwrap();
        register
    }

    #[test]
    fn test_checkout_receipt() {
        let mut register = register();
        register.add_to_cart("X1").unwrap();
        register.add_to_cart("X1").unwrap();

        let response = checkout(&mut register).unwrap();
        let receipt = response.render(register.settings());
        assert!(receipt.starts_with("Mi Tienda\nSALE-"));
        assert!(receipt.contains("S/. 41.77"));

        let found = get_sale(&register, &response.sale.id).unwrap();
        assert_eq!(found.sale, response.sale);
    }

    #[test]
    fn test_empty_cart_code() {
        let mut register = register();
        assert_eq!(checkout(&mut register).unwrap_err().code, ErrorCode::EmptyCart);
    }

    #[test]
    fn test_storage_failure_keeps_cart() {
        let mut register = register();
        register.add_to_cart("X1").unwrap();
        register.store_mut().fail_writes_to(RecordKey::Sales);

        let err = checkout(&mut register).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(register.cart().reserved("X1"), 1);
        assert!(list_sales(&register).sales.is_empty());
    }

    #[test]
    fn test_history_newest_first() {
        let mut register = register();
        register.add_to_cart("X1").unwrap();
        let first = checkout(&mut register).unwrap().sale;
        register.add_to_cart("X1").unwrap();
        let second = checkout(&mut register).unwrap().sale;

        let history = list_sales(&register);
        assert_eq!(history.sales, vec![second, first]);
        assert_eq!(get_sale(&register, "SALE-1").unwrap_err().code, ErrorCode::NotFound);
    }
}

//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Finalized│                        │
//! │  │  Cart    │     │          │     │   Sale   │                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │                        │                 ▲                              │
//! │                   add <sku>          checkout                           │
//! │                   remove <sku>       (sale.rs)                          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear ────────────────────────► (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every add reserves one unit of live stock immediately; remove and clear
//! hand the units back.

use serde::Serialize;
use tracing::debug;

use tienda_core::{CartLine, CartSession, CartTotals, StoreSettings, IGV_RATE};
use tienda_store::{RecordStore, Register};

use super::{fit, Render};
use crate::error::ApiError;

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&CartSession> for CartResponse {
    fn from(cart: &CartSession) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
        }
    }
}

impl Render for CartResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        if self.lines.is_empty() {
            return "Cart is empty".to_string();
        }

        let mut out = format!("Cart ({} units)\n", self.totals.unit_count);
        for line in &self.lines {
            out.push_str(&format!(
                "  {:<10} {:<24} x{:<4} {:>12}\n",
                fit(&line.sku, 10),
                fit(&line.name, 24),
                line.quantity,
                settings.format_currency(line.line_total())
            ));
        }
        out.push_str(&format!(
            "  {:<41} {:>12}\n",
            "Subtotal",
            settings.format_currency(self.totals.subtotal)
        ));
        out.push_str(&format!(
            "  {:<41} {:>12}\n",
            format!("IGV ({}%)", IGV_RATE.percentage()),
            settings.format_currency(self.totals.tax)
        ));
        out.push_str(&format!(
            "  {:<41} {:>12}",
            "TOTAL",
            settings.format_currency(self.totals.total)
        ));
        out
    }
}

/// Gets the current cart contents.
pub fn get_cart<S: RecordStore>(register: &Register<S>) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from(register.cart())
}

/// Adds one unit of a product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases by one
/// - If product not in cart: added as new line with its current name,
///   price and cost frozen
/// - Sold out (or unknown) product: `OUT_OF_STOCK`, cart unchanged
pub fn add_to_cart<S: RecordStore>(
    register: &mut Register<S>,
    sku: &str,
) -> Result<CartResponse, ApiError> {
    debug!(sku = %sku, "add_to_cart command");
    register.add_to_cart(sku)?;
    Ok(CartResponse::from(register.cart()))
}

/// Removes a whole line. Removing an absent line is a no-op.
pub fn remove_from_cart<S: RecordStore>(register: &mut Register<S>, sku: &str) -> CartResponse {
    debug!(sku = %sku, "remove_from_cart command");
    register.remove_from_cart(sku);
    CartResponse::from(register.cart())
}

/// Clears all lines from the cart.
///
/// ## When Used
/// - Cashier cancels the sale
/// - Shell exit with a pending cart
pub fn clear_cart<S: RecordStore>(register: &mut Register<S>) -> CartResponse {
    debug!("clear_cart command");
    register.clear_cart();
    CartResponse::from(register.cart())
}

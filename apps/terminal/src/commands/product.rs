//! # Product Commands
//!
//! Catalog listing, the point-of-sale grid, and catalog maintenance.
//!
//! ## Two Views of the Catalog
//! ```text
//! products [query]                        grid [query]
//! ┌──────────────────────────────────┐    ┌──────────────┐ ┌──────────────┐
//! │ SKU  Name      Price  Stock  Min │    │ X1           │ │ Y2           │
//! │ X1   Gaseosa   17.70      5    1 │    │ Gaseosa      │ │ Galletas     │
//! │ Y2   Galletas   3.00      0    1 │    │ S/. 17.70    │ │ SOLD OUT     │
//! └──────────────────────────────────┘    └──────────────┘ └──────────────┘
//!   back office (low stock flagged)         cashier (click = add <sku>)
//! ```
//!
//! Stock shown is always live stock: units in the cart are already gone.

use clap::Args;
use serde::Serialize;
use tracing::debug;

use tienda_core::validation::normalize_sku;
use tienda_core::{derive_price_from_input, Money, Product, ProductDraft, StoreSettings};
use tienda_store::{RecordStore, Register};

use super::{fit, parse_margin, parse_money, Render};
use crate::error::ApiError;

/// Fields of `product add` / `product edit`.
#[derive(Debug, Clone, Args)]
pub struct ProductForm {
    /// Stock keeping unit (immutable once created)
    pub sku: String,
    /// Display name (quote it if it has spaces)
    pub name: String,
    /// Unit cost, e.g. 10.00
    pub cost: String,
    /// Markup percentage over cost, e.g. 50
    pub margin: String,
    /// Units on hand
    pub stock: u32,
    /// Low-stock threshold
    pub min_stock: u32,
}

impl ProductForm {
    fn into_draft(self) -> Result<ProductDraft, ApiError> {
        let cost = parse_money("cost", &self.cost)?;
        let margin = parse_margin(&self.margin)?;
        Ok(ProductDraft::new(
            self.sku,
            self.name,
            cost,
            margin,
            self.stock,
            self.min_stock,
        ))
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Catalog table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub query: String,
    pub products: Vec<Product>,
}

impl Render for ProductListResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        if self.products.is_empty() {
            return if self.query.is_empty() {
                "No products yet. Use `product add`.".to_string()
            } else {
                format!("No products match '{}'", self.query)
            };
        }

        let mut out = format!(
            "{:<10} {:<24} {:>12} {:>6} {:>5}\n",
            "SKU", "Name", "Price", "Stock", "Min"
        );
        for product in &self.products {
            out.push_str(&format!(
                "{:<10} {:<24} {:>12} {:>6} {:>5}{}\n",
                fit(&product.sku, 10),
                fit(&product.name, 24),
                settings.format_currency(product.price),
                product.stock,
                product.min_stock,
                if product.is_low_stock() { "  LOW" } else { "" }
            ));
        }
        out.push_str(&format!("{} product(s)", self.products.len()));
        out
    }
}

/// One card of the cashier grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub sku: String,
    pub name: String,
    pub price: Money,
    pub stock: u32,
    /// Sold-out cards are greyed out and cannot be added.
    pub sold_out: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        ProductCard {
            sku: product.sku.clone(),
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            sold_out: product.is_sold_out(),
        }
    }
}

/// The cashier's product grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGridResponse {
    pub cards: Vec<ProductCard>,
}

impl Render for ProductGridResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        if self.cards.is_empty() {
            return "Nothing to sell".to_string();
        }
        self.cards
            .iter()
            .map(|card| {
                let badge = if card.sold_out {
                    "SOLD OUT".to_string()
                } else {
                    format!("{} ({} left)", settings.format_currency(card.price), card.stock)
                };
                format!("[{}] {} | {}", card.sku, card.name, badge)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A created, edited or deleted product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub action: &'static str,
    pub product: Product,
}

impl Render for ProductResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        format!(
            "{} {} {} (cost {}, margin {}, price {}, stock {})",
            self.action,
            self.product.sku,
            self.product.name,
            settings.format_currency(self.product.cost),
            self.product.margin,
            settings.format_currency(self.product.price),
            self.product.stock
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockResponse {
    pub sku: String,
    pub added: u32,
    pub stock: u32,
}

impl Render for RestockResponse {
    fn render(&self, _settings: &StoreSettings) -> String {
        format!("Restocked {} +{} → {} on hand", self.sku, self.added, self.stock)
    }
}

/// Live price preview while typing cost and margin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePreview {
    /// `None` while either input is not a valid non-negative number.
    pub price: Option<Money>,
}

impl Render for PricePreview {
    fn render(&self, settings: &StoreSettings) -> String {
        match self.price {
            Some(price) => format!("Price: {}", settings.format_currency(price)),
            None => "Price: n/a (enter a valid cost and margin)".to_string(),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Lists the catalog, optionally filtered by name or SKU.
pub fn list_products<S: RecordStore>(
    register: &Register<S>,
    query: &str,
) -> Result<ProductListResponse, ApiError> {
    debug!(query = %query, "list_products command");
    let products = register
        .search_products(query)?
        .into_iter()
        .cloned()
        .collect();
    Ok(ProductListResponse {
        query: query.trim().to_string(),
        products,
    })
}

/// Product cards for the cashier.
pub fn product_grid<S: RecordStore>(
    register: &Register<S>,
    query: &str,
) -> Result<ProductGridResponse, ApiError> {
    debug!(query = %query, "product_grid command");
    let cards = register
        .search_products(query)?
        .into_iter()
        .map(ProductCard::from)
        .collect();
    Ok(ProductGridResponse { cards })
}

pub fn create_product<S: RecordStore>(
    register: &mut Register<S>,
    form: ProductForm,
) -> Result<ProductResponse, ApiError> {
    debug!(sku = %form.sku, "create_product command");
    let product = register.add_product(form.into_draft()?)?;
    Ok(ProductResponse {
        action: "Created",
        product,
    })
}

/// Edits the product named by `form.sku`. The SKU itself cannot change.
pub fn update_product<S: RecordStore>(
    register: &mut Register<S>,
    form: ProductForm,
) -> Result<ProductResponse, ApiError> {
    debug!(sku = %form.sku, "update_product command");
    let sku = form.sku.clone();
    let product = register.update_product(&sku, form.into_draft()?)?;
    Ok(ProductResponse {
        action: "Updated",
        product,
    })
}

pub fn delete_product<S: RecordStore>(
    register: &mut Register<S>,
    sku: &str,
) -> Result<ProductResponse, ApiError> {
    debug!(sku = %sku, "delete_product command");
    let product = register.delete_product(sku)?;
    Ok(ProductResponse {
        action: "Deleted",
        product,
    })
}

pub fn restock_product<S: RecordStore>(
    register: &mut Register<S>,
    sku: &str,
    qty: u32,
) -> Result<RestockResponse, ApiError> {
    debug!(sku = %sku, qty, "restock_product command");
    let stock = register.restock(sku, qty)?;
    Ok(RestockResponse {
        sku: normalize_sku(sku),
        added: qty,
        stock,
    })
}

/// Derives the price a product would get. Never fails: invalid input
/// yields an empty preview.
pub fn price_preview(cost: &str, margin: &str) -> PricePreview {
    PricePreview {
        price: derive_price_from_input(cost, margin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tienda_store::MemoryStore;

    fn form(sku: &str, cost: &str, stock: u32) -> ProductForm {
        ProductForm {
            sku: sku.to_string(),
            name: "Gaseosa 500ml".to_string(),
            cost: cost.to_string(),
            margin: "50".to_string(),
            stock,
            min_stock: 1,
        }
    }

    #[test]
    fn test_create_and_list() {
        let mut register = Register::open(MemoryStore::new());
        let created = create_product(&mut register, form("x1", "10", 5)).unwrap();
        assert_eq!(created.product.price.cents(), 1770);

        let list = list_products(&register, "gase").unwrap();
        assert_eq!(list.products.len(), 1);
        let text = list.render(register.settings());
        assert!(text.contains("S/. 17.70"));
        assert!(!text.contains("LOW"));
    }

    #[test]
    fn test_bad_cost_is_validation_error() {
        let mut register = Register::open(MemoryStore::new());
        let err = create_product(&mut register, form("X1", "diez", 5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(register.ledger().products().is_empty());
    }

    #[test]
    fn test_out_of_range_product_is_validation_error() {
        let mut register = Register::open(MemoryStore::new());
        let err = create_product(&mut register, form("BIG", "92233720368547758", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Cost within range, price above it
        let err = create_product(&mut register, form("BIG", "900000000", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_product(&mut register, form("BIG", "10", u32::MAX)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(register.ledger().products().is_empty());
        assert_eq!(price_preview("900000000", "50").price, None);
    }

    #[test]
    fn test_grid_marks_sold_out() {
        let mut register = Register::open(MemoryStore::new());
        create_product(&mut register, form("X1", "10", 1)).unwrap();
        register.add_to_cart("X1").unwrap();

        let grid = product_grid(&register, "").unwrap();
        assert!(grid.cards[0].sold_out);
        assert!(grid.render(register.settings()).contains("SOLD OUT"));
    }

    #[test]
    fn test_update_keeps_sku() {
        let mut register = Register::open(MemoryStore::new());
        create_product(&mut register, form("X1", "10", 5)).unwrap();
        let updated = update_product(&mut register, form("x1", "20", 7)).unwrap();
        assert_eq!(updated.product.sku, "X1");
        assert_eq!(updated.product.price.cents(), 3540);
    }

    #[test]
    fn test_restock_and_delete() {
        let mut register = Register::open(MemoryStore::new());
        create_product(&mut register, form("X1", "10", 5)).unwrap();
        assert_eq!(restock_product(&mut register, "x1", 3).unwrap().stock, 8);

        delete_product(&mut register, "X1").unwrap();
        let err = delete_product(&mut register, "X1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_price_preview() {
        assert_eq!(price_preview("10", "50").price.map(|p| p.cents()), Some(1770));
        assert_eq!(price_preview("", "50").price, None);
    }
}

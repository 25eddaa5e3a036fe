//! # Domain Types
//!
//! Core domain types used throughout Tienda POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku (UPPER)    │◄──│  sku            │──►│  id SALE-<ms>   │       │
//! │  │  cost, margin   │   │  name, price,   │   │  total, cost    │       │
//! │  │  price (derived)│   │  cost snapshot  │   │  items (frozen) │       │
//! │  │  stock ≥ 0      │   │  quantity > 0   │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │  CashMovement   │   │  StoreSettings  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  store_name     │       │
//! │  │  dni (business) │   │  kind In | Out  │   │  currency_symbol│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Cart lines and sale lines copy name and price from the product when the
//! unit is added, so a later catalog edit never rewrites a sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::derive_price;
use crate::validation::{
    normalize_sku, validate_non_negative_money, validate_product_name, validate_sku,
    validate_stock,
};
use crate::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_STORE_NAME};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (Peruvian IGV)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Margin
// =============================================================================

/// Markup over cost, in basis points (5000 = 50%).
///
/// Margins are unbounded above: a 300% markup is legitimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Margin(u32);

impl Margin {
    /// Creates a margin from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Margin(bps)
    }

    /// Creates a margin from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Margin(percent * 100)
    }

    /// Returns the margin in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

/// Parses a percentage such as `"50"`, `"12.5"` or `"7.25"`.
///
/// Negative values and more than two decimals are rejected.
impl FromStr for Margin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "margin".to_string(),
            reason: format!("'{}' is not a non-negative percentage", s.trim()),
        };

        // A percentage has the same shape as an amount: two decimals at most.
        let hundredths = s.parse::<Money>().map_err(|_| invalid())?.cents();
        if hundredths < 0 {
            return Err(invalid());
        }
        u32::try_from(hundredths).map(Margin).map_err(|_| invalid())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// ## Invariants
/// - `sku` is trimmed uppercase and unique within the catalog
/// - `price` was derived from `cost` and `margin` when the product was
///   created or last edited; it is stored, not recomputed on read
/// - `stock` can never be negative (the type forbids it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown on the product grid and receipts.
    pub name: String,

    /// Unit purchase cost.
    pub cost: Money,

    /// Markup over cost used to derive the price.
    pub margin: Margin,

    /// Unit sale price, tax included.
    pub price: Money,

    /// Units on hand (live value, reservations already subtracted).
    pub stock: u32,

    /// Threshold at or below which the product counts as low stock.
    pub min_stock: u32,
}

impl Product {
    /// Stock at or below the configured minimum.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// No units left to sell.
    #[inline]
    pub fn is_sold_out(&self) -> bool {
        self.stock == 0
    }
}

/// Product form input before validation and price derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub cost: Money,
    pub margin: Margin,
    pub stock: u32,
    pub min_stock: u32,
}

impl ProductDraft {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        cost: Money,
        margin: Margin,
        stock: u32,
        min_stock: u32,
    ) -> Self {
        ProductDraft {
            sku: sku.into(),
            name: name.into(),
            cost,
            margin,
            stock,
            min_stock,
        }
    }

    /// Validates the draft and derives the sale price.
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::{Margin, Money, ProductDraft};
    ///
    /// let product = ProductDraft::new(" x1 ", "Gaseosa", Money::from_cents(1000), Margin::from_percent(50), 5, 1)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(product.sku, "X1");
    /// assert_eq!(product.price.cents(), 1770);
    /// ```
    pub fn build(self) -> CoreResult<Product> {
        validate_sku(&self.sku)?;
        validate_product_name(&self.name)?;
        validate_non_negative_money("cost", self.cost)?;
        validate_stock("stock", self.stock)?;
        validate_stock("min stock", self.min_stock)?;
        let price = derive_price(self.cost, self.margin)?;

        Ok(Product {
            sku: normalize_sku(&self.sku),
            name: self.name.trim().to_string(),
            cost: self.cost,
            margin: self.margin,
            price,
            stock: self.stock,
            min_stock: self.min_stock,
        })
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the in-progress cart. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub sku: String,
    /// Product name when the first unit was added (frozen).
    pub name: String,
    /// Unit price when the first unit was added (frozen).
    pub price: Money,
    /// Unit cost when the first unit was added (frozen).
    pub cost: Money,
    /// Units reserved by this line, always > 0.
    pub quantity: u32,
}

impl CartLine {
    /// Starts a line with one unit, snapshotting the product.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            sku: product.sku.clone(),
            name: product.name.clone(),
            price: product.price,
            cost: product.cost,
            quantity: 1,
        }
    }

    /// Price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Cost × quantity.
    #[inline]
    pub fn line_cost(&self) -> Money {
        self.cost.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A finalized sale. Immutable once created; the sales ledger is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    /// `SALE-<unix millis>`, unique within the ledger.
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// Tax-inclusive amount charged, recomputed from cart state.
    pub total: Money,
    /// Sum of line costs (cost of goods sold).
    pub cost: Money,
    pub items: Vec<SaleLine>,
}

impl Sale {
    /// Gross profit of this sale (`total - cost`).
    #[inline]
    pub fn profit(&self) -> Money {
        self.total - self.cost
    }

    /// Units sold across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items.iter().fold(0u32, |units, i| units.saturating_add(i.quantity))
    }
}

/// A sold line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLine {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

impl From<&CartLine> for SaleLine {
    fn from(line: &CartLine) -> Self {
        SaleLine {
            sku: line.sku.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered customer.
///
/// ## Dual-Key Identity
/// - `id`: UUID v4, immutable
/// - `dni`: national id, human-readable and unique, editable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub dni: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Client form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientDraft {
    pub dni: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// =============================================================================
// Cash Movement
// =============================================================================

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MovementKind {
    /// Money entering the till.
    In,
    /// Money leaving the till.
    Out,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::In => f.write_str("in"),
            MovementKind::Out => f.write_str("out"),
        }
    }
}

/// One entry of the cash-flow log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashMovement {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub kind: MovementKind,
    pub description: String,
    /// Always positive; `kind` carries the sign.
    pub amount: Money,
}

impl CashMovement {
    /// Amount with the sign implied by `kind`.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            MovementKind::In => self.amount,
            MovementKind::Out => Money::zero() - self.amount,
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Owner-editable store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct StoreSettings {
    pub store_name: String,
    pub currency_symbol: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            store_name: DEFAULT_STORE_NAME.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl StoreSettings {
    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::{Money, StoreSettings};
    ///
    /// let settings = StoreSettings::default();
    /// assert_eq!(settings.format_currency(Money::from_cents(4177)), "S/. 41.77");
    /// assert_eq!(settings.format_currency(Money::from_cents(-550)), "-S/. 5.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!("{}{} {}", sign, self.currency_symbol, amount.abs())
    }

    /// Title shown by the renderer (`ERP - <store name>`).
    pub fn app_title(&self) -> String {
        format!("ERP - {}", self.store_name)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(stock: u32, min_stock: u32) -> Product {
        ProductDraft::new(
            "x1",
            "Gaseosa 500ml",
            Money::from_cents(1000),
            Margin::from_percent(50),
            stock,
            min_stock,
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_margin_parse() {
        assert_eq!("50".parse::<Margin>().unwrap().bps(), 5000);
        assert_eq!("12.5".parse::<Margin>().unwrap().bps(), 1250);
        assert_eq!("0".parse::<Margin>().unwrap().bps(), 0);
        assert!("-5".parse::<Margin>().is_err());
        assert!("abc".parse::<Margin>().is_err());
        assert!("1.005".parse::<Margin>().is_err());
    }

    #[test]
    fn test_margin_display() {
        assert_eq!(Margin::from_percent(50).to_string(), "50%");
        assert_eq!(Margin::from_bps(1250).to_string(), "12.50%");
    }

    #[test]
    fn test_draft_build_normalizes_and_prices() {
        let product = sample_product(5, 1);
        assert_eq!(product.sku, "X1");
        assert_eq!(product.price.cents(), 1770);
        assert_eq!(product.stock, 5);
    }

    #[test]
    fn test_draft_build_rejects_bad_input() {
        let mut draft = ProductDraft::new("", "Name", Money::zero(), Margin::default(), 0, 0);
        assert!(draft.clone().build().is_err());

        draft.sku = "OK-1".to_string();
        draft.name = "   ".to_string();
        assert!(draft.clone().build().is_err());

        draft.name = "Name".to_string();
        draft.cost = Money::from_cents(-1);
        assert!(draft.build().is_err());
    }

    #[test]
    fn test_draft_build_rejects_out_of_range_amounts() {
        let draft = ProductDraft::new(
            "BIG",
            "Caja fuerte",
            Money::from_cents(9_223_372_036_854_775),
            Margin::from_percent(50),
            1,
            0,
        );
        assert!(matches!(
            draft.clone().build(),
            Err(crate::error::CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let mut draft = ProductDraft::new("BIG", "Caja", Money::from_cents(1000), Margin::default(), 0, 0);
        draft.stock = u32::MAX;
        assert!(draft.clone().build().is_err());

        draft.stock = 1;
        draft.min_stock = crate::validation::MAX_STOCK + 1;
        assert!(draft.build().is_err());
    }

    #[test]
    fn test_low_stock_and_sold_out() {
        assert!(sample_product(1, 1).is_low_stock());
        assert!(!sample_product(2, 1).is_low_stock());
        assert!(sample_product(0, 0).is_sold_out());
    }

    #[test]
    fn test_cart_line_snapshot() {
        let product = sample_product(5, 1);
        let mut line = CartLine::from_product(&product);
        line.quantity = 2;
        assert_eq!(line.line_total().cents(), 3540);
        assert_eq!(line.line_cost().cents(), 2000);
        assert_eq!(SaleLine::from(&line).quantity, 2);
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(sample_product(5, 1)).unwrap();
        assert_eq!(json["sku"], "X1");
        assert_eq!(json["minStock"], 1);
        assert_eq!(json["price"], 1770);
    }

    #[test]
    fn test_signed_cash_amount() {
        let movement = CashMovement {
            id: "m1".to_string(),
            date: Utc::now(),
            kind: MovementKind::Out,
            description: "Proveedor".to_string(),
            amount: Money::from_cents(2500),
        };
        assert_eq!(movement.signed_amount().cents(), -2500);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = StoreSettings::default();
        assert_eq!(settings.store_name, "Mi Tienda");
        assert_eq!(settings.app_title(), "ERP - Mi Tienda");

        let partial: StoreSettings = serde_json::from_str(r#"{"storeName":"Bodega Ana"}"#).unwrap();
        assert_eq!(partial.currency_symbol, "S/.");
    }
}

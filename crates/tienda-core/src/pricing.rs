//! # Price Derivation
//!
//! ```text
//! price = cost × (1 + margin/100) × (1 + IGV)
//! ```
//!
//! Computed once in integer math when a product is created or edited and
//! stored on the product.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Margin;
use crate::validation::{validate_non_negative_money, ValidationResult};
use crate::IGV_RATE;

const BPS: i128 = 10_000;

/// Derives the tax-inclusive sale price from cost and margin.
///
/// Rounds half up to the cent, once, after both multiplications.
///
/// ## Errors
/// `OutOfRange` when the cost is negative or above [`Money::MAX`], or when
/// the derived price would exceed [`Money::MAX`].
///
/// ## Example
/// ```rust
/// use tienda_core::{derive_price, Margin, Money};
///
/// // 10.00 × 1.5 × 1.18 = 17.70
/// let price = derive_price(Money::from_cents(1000), Margin::from_percent(50)).unwrap();
/// assert_eq!(price.cents(), 1770);
/// ```
pub fn derive_price(cost: Money, margin: Margin) -> ValidationResult<Money> {
    validate_non_negative_money("cost", cost)?;

    let numerator = cost.cents() as i128
        * (BPS + margin.bps() as i128)
        * (BPS + IGV_RATE.bps() as i128);
    let denominator = BPS * BPS;
    let cents = (numerator + denominator / 2) / denominator;

    let price = i64::try_from(cents)
        .map(Money::from_cents)
        .ok()
        .filter(|price| *price <= Money::MAX)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: Money::MAX.cents(),
        })?;
    Ok(price)
}

/// Derives a price from raw form input.
///
/// Returns `None` (a blank price) when either input is not a valid
/// non-negative number, or the result is out of range. A product must not
/// be saved in that state.
///
/// ## Example
/// ```rust
/// use tienda_core::derive_price_from_input;
///
/// assert_eq!(derive_price_from_input("10", "50").unwrap().cents(), 1770);
/// assert!(derive_price_from_input("", "50").is_none());
/// assert!(derive_price_from_input("10", "-5").is_none());
/// ```
pub fn derive_price_from_input(cost: &str, margin: &str) -> Option<Money> {
    let cost: Money = cost.parse().ok()?;
    let margin: Margin = margin.parse().ok()?;
    derive_price(cost, margin).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_price_scenario() {
        assert_eq!(
            derive_price(Money::from_cents(1000), Margin::from_percent(50)).unwrap().cents(),
            1770
        );
    }

    #[test]
    fn test_derive_price_zero_margin_and_cost() {
        // Tax only: 2.50 × 1.18 = 2.95
        assert_eq!(derive_price(Money::from_cents(250), Margin::default()).unwrap().cents(), 295);
        assert_eq!(derive_price(Money::zero(), Margin::from_percent(80)).unwrap().cents(), 0);
    }

    #[test]
    fn test_derive_price_rounds_once() {
        // 3.33 × 1.125 × 1.18 = 4.4206... → 4.42
        assert_eq!(derive_price(Money::from_cents(333), Margin::from_bps(1250)).unwrap().cents(), 442);
    }

    #[test]
    fn test_derive_price_from_input_blank_cases() {
        assert!(derive_price_from_input("abc", "10").is_none());
        assert!(derive_price_from_input("-1", "10").is_none());
        assert!(derive_price_from_input("1", "").is_none());
        assert_eq!(derive_price_from_input("2.5", "0").unwrap().cents(), 295);
    }

    #[test]
    fn test_derive_price_rejects_prices_beyond_limit() {
        // Cost at the limit: the derived price no longer fits
        assert!(matches!(
            derive_price(Money::MAX, Margin::from_percent(50)),
            Err(ValidationError::OutOfRange { .. })
        ));
        // Out-of-range cost never reaches the multiplication
        assert!(derive_price(Money::from_cents(i64::MAX), Margin::from_bps(u32::MAX)).is_err());
        assert!(derive_price(Money::from_cents(-1), Margin::default()).is_err());
        assert!(derive_price_from_input("92233720368547758", "50").is_none());
        assert!(derive_price_from_input("1000000000", "50").is_none());
    }
}

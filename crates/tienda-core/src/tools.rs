//! # Business Tools
//!
//! Owner calculators: break-even point and profit simulation.
//!
//! ```text
//! contribution = unit price - unit variable cost
//! break-even units   = fixed costs / contribution
//! break-even revenue = break-even units × unit price
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_non_negative_money;

/// Result of the break-even calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BreakEven {
    /// Units needed, in hundredths of a unit (1250 = 12.50 units).
    pub units_hundredths: i64,
    /// Revenue at the break-even point.
    pub revenue: Money,
}

impl BreakEven {
    /// Units formatted with two decimals (`"12.50"`).
    pub fn units_display(&self) -> String {
        format!("{}.{:02}", self.units_hundredths / 100, self.units_hundredths % 100)
    }
}

/// Computes the break-even point.
///
/// Both results are rounded half up from the exact quotient, so revenue is
/// not skewed by the rounding of the unit count.
///
/// ## Errors
/// - `NonPositiveContribution` if `unit_price <= unit_variable_cost`
/// - `Validation` if any input is negative
///
/// ## Example
/// ```rust
/// use tienda_core::money::Money;
/// use tienda_core::tools::break_even;
///
/// // 1000.00 fixed, 25.00 price, 15.00 variable → 100 units, 2500.00
/// let result = break_even(Money::from_cents(100_000), Money::from_cents(2500), Money::from_cents(1500)).unwrap();
/// assert_eq!(result.units_hundredths, 10_000);
/// assert_eq!(result.revenue.cents(), 250_000);
/// ```
pub fn break_even(fixed_costs: Money, unit_price: Money, unit_variable_cost: Money) -> CoreResult<BreakEven> {
    validate_non_negative_money("fixed costs", fixed_costs)?;
    validate_non_negative_money("unit price", unit_price)?;
    validate_non_negative_money("unit variable cost", unit_variable_cost)?;

    let contribution = (unit_price - unit_variable_cost).cents() as i128;
    if contribution <= 0 {
        return Err(CoreError::NonPositiveContribution);
    }

    let fixed = fixed_costs.cents() as i128;
    let units_hundredths = div_round(fixed * 100, contribution);
    let revenue = div_round(fixed * unit_price.cents() as i128, contribution);

    Ok(BreakEven {
        units_hundredths: i64::try_from(units_hundredths).map_err(|_| out_of_range("break-even units"))?,
        revenue: i64::try_from(revenue)
            .map(Money::from_cents)
            .map_err(|_| out_of_range("break-even revenue"))?,
    })
}

/// Sign of a simulated net profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ProfitOutcome {
    Profit,
    Loss,
    BreakEven,
}

/// Result of the profit simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfitSimulation {
    pub revenue: Money,
    /// Variable cost of the units plus fixed costs.
    pub total_cost: Money,
    pub net_profit: Money,
    pub outcome: ProfitOutcome,
}

/// Projects profit for a given sales volume.
///
/// ## Errors
/// `Validation` if an input is negative or above [`Money::MAX`], or if a
/// result does not fit in `Money`.
pub fn simulate_profit(
    units_sold: u32,
    unit_price: Money,
    unit_variable_cost: Money,
    fixed_costs: Money,
) -> CoreResult<ProfitSimulation> {
    validate_non_negative_money("unit price", unit_price)?;
    validate_non_negative_money("unit variable cost", unit_variable_cost)?;
    validate_non_negative_money("fixed costs", fixed_costs)?;

    let revenue = unit_price
        .checked_multiply_quantity(units_sold)
        .ok_or_else(|| out_of_range("revenue"))?;
    let total_cost = unit_variable_cost
        .checked_multiply_quantity(units_sold)
        .and_then(|variable| variable.checked_add(fixed_costs))
        .ok_or_else(|| out_of_range("total cost"))?;
    let net_profit = revenue
        .checked_sub(total_cost)
        .ok_or_else(|| out_of_range("net profit"))?;

    let outcome = if net_profit.is_positive() {
        ProfitOutcome::Profit
    } else if net_profit.is_negative() {
        ProfitOutcome::Loss
    } else {
        ProfitOutcome::BreakEven
    };

    Ok(ProfitSimulation {
        revenue,
        total_cost,
        net_profit,
        outcome,
    })
}

fn out_of_range(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    }
    .into()
}

/// Half-up division for non-negative numerators and positive divisors.
fn div_round(numerator: i128, divisor: i128) -> i128 {
    (numerator + divisor / 2) / divisor
}

//! # Business Tool Commands
//!
//! `breakeven <fixed> <price> <variable>` and
//! `simulate <units> <price> <variable> <fixed>`.

use serde::Serialize;
use tracing::debug;

use tienda_core::tools::{break_even as compute_break_even, simulate_profit};
use tienda_core::{BreakEven, ProfitOutcome, ProfitSimulation, StoreSettings};

use super::{parse_money, Render};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenResponse {
    #[serde(flatten)]
    pub result: BreakEven,
    pub units: String,
}

impl Render for BreakEvenResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        format!(
            "Break-even: {} units, revenue {}",
            self.units,
            settings.format_currency(self.result.revenue)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub units_sold: u32,
    #[serde(flatten)]
    pub result: ProfitSimulation,
}

impl Render for SimulationResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        let verdict = match self.result.outcome {
            ProfitOutcome::Profit => "PROFIT",
            ProfitOutcome::Loss => "LOSS",
            ProfitOutcome::BreakEven => "BREAK-EVEN",
        };
        format!(
            "{} units: revenue {}, total cost {}, net {} ({})",
            self.units_sold,
            settings.format_currency(self.result.revenue),
            settings.format_currency(self.result.total_cost),
            settings.format_currency(self.result.net_profit),
            verdict
        )
    }
}

pub fn break_even(fixed: &str, price: &str, variable: &str) -> Result<BreakEvenResponse, ApiError> {
    debug!(fixed = %fixed, price = %price, variable = %variable, "break_even command");
    let result = compute_break_even(
        parse_money("fixed costs", fixed)?,
        parse_money("unit price", price)?,
        parse_money("unit variable cost", variable)?,
    )?;
    Ok(BreakEvenResponse {
        units: result.units_display(),
        result,
    })
}

pub fn simulate(
    units_sold: u32,
    price: &str,
    variable: &str,
    fixed: &str,
) -> Result<SimulationResponse, ApiError> {
    debug!(units_sold, "simulate command");
    let result = simulate_profit(
        units_sold,
        parse_money("unit price", price)?,
        parse_money("unit variable cost", variable)?,
        parse_money("fixed costs", fixed)?,
    )?;
    Ok(SimulationResponse { units_sold, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_break_even() {
        let response = break_even("1000", "25", "15").unwrap();
        assert_eq!(response.units, "100.00");
        assert_eq!(
            response.render(&StoreSettings::default()),
            "Break-even: 100.00 units, revenue S/. 2500.00"
        );
    }

    #[test]
    fn test_break_even_without_contribution() {
        let err = break_even("1000", "10", "10").unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_simulate_loss() {
        let response = simulate(10, "25", "15", "1000").unwrap();
        assert_eq!(response.result.outcome, ProfitOutcome::Loss);
        assert!(response.render(&StoreSettings::default()).ends_with("(LOSS)"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["netProfit"], -90_000);
        assert_eq!(json["outcome"], "loss");
    }

    #[test]
    fn test_simulate_huge_volume_reports_validation_error() {
        let err = simulate(4_000_000_000, "1000000000", "0", "0").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = simulate(4_000_000_000, "92233720368547758", "0", "0").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}

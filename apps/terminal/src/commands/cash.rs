//! # Cash Book Commands
//!
//! `cash` shows the movements and the derived balance; `cash in` and
//! `cash out` record money entering or leaving the till.

use serde::Serialize;
use tracing::debug;

use tienda_core::{CashMovement, CashSummary, MovementKind, StoreSettings};
use tienda_store::{RecordStore, Register};

use super::{parse_money, Render};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashReport {
    pub movements: Vec<CashMovement>,
    pub summary: CashSummary,
}

impl Render for CashReport {
    fn render(&self, settings: &StoreSettings) -> String {
        let mut out = String::new();
        for movement in &self.movements {
            out.push_str(&format!(
                "{}  {:<3} {:>12}  {}\n",
                movement.date.format("%Y-%m-%d %H:%M"),
                movement.kind.to_string(),
                settings.format_currency(movement.signed_amount()),
                movement.description
            ));
        }
        out.push_str(&format!(
            "In {}  Out {}  Balance {}",
            settings.format_currency(self.summary.total_in),
            settings.format_currency(self.summary.total_out),
            settings.format_currency(self.summary.balance)
        ));
        out
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovementResponse {
    pub movement: CashMovement,
    pub summary: CashSummary,
}

impl Render for CashMovementResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        format!(
            "Recorded {} {} ({}). Balance {}",
            self.movement.kind,
            settings.format_currency(self.movement.amount),
            self.movement.description,
            settings.format_currency(self.summary.balance)
        )
    }
}

pub fn cash_report<S: RecordStore>(register: &Register<S>) -> CashReport {
    debug!("cash_report command");
    CashReport {
        movements: register.cash_movements().to_vec(),
        summary: register.cash_summary(),
    }
}

/// Records a movement. `amount` is decimal text and must be positive.
pub fn record_cash<S: RecordStore>(
    register: &mut Register<S>,
    kind: MovementKind,
    amount: &str,
    description: &str,
) -> Result<CashMovementResponse, ApiError> {
    debug!(kind = %kind, amount = %amount, "record_cash command");
    let amount = parse_money("amount", amount)?;
    let movement = register.record_cash(kind, description, amount)?;
    Ok(CashMovementResponse {
        movement,
        summary: register.cash_summary(),
    })
}

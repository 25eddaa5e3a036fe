//! # Cash Book
//!
//! Manual cash-flow log (money put into or taken out of the till).
//!
//! The balance is always derived from the movements; it is never stored on
//! its own, so it cannot drift from the log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{CashMovement, MovementKind};
use crate::validation::validate_positive_money;

/// Totals shown above the movement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashSummary {
    pub total_in: Money,
    pub total_out: Money,
    pub balance: Money,
}

#[derive(Debug, Default, Clone)]
pub struct CashBook {
    movements: Vec<CashMovement>,
}

impl CashBook {
    pub fn new(movements: Vec<CashMovement>) -> Self {
        CashBook { movements }
    }

    /// Movements in the order they were recorded.
    pub fn movements(&self) -> &[CashMovement] {
        &self.movements
    }

    /// Appends a movement.
    ///
    /// ## Errors
    /// `Validation(MustBePositive)` unless `amount > 0`.
    pub fn record(
        &mut self,
        kind: MovementKind,
        description: &str,
        amount: Money,
        date: DateTime<Utc>,
    ) -> CoreResult<&CashMovement> {
        validate_positive_money("amount", amount)?;

        let movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            date,
            kind,
            description: description.trim().to_string(),
            amount,
        };

        debug!(kind = %kind, amount = %amount, "Recorded cash movement");
        self.movements.push(movement);
        Ok(&self.movements[self.movements.len() - 1])
    }

    pub fn summary(&self) -> CashSummary {
        let total = |kind: MovementKind| -> Money {
            self.movements
                .iter()
                .filter(|m| m.kind == kind)
                .map(|m| m.amount)
                .sum()
        };

        let total_in = total(MovementKind::In);
        let total_out = total(MovementKind::Out);

        CashSummary {
            total_in,
            total_out,
            balance: total_in - total_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    #[test]
    fn test_summary_derives_balance() {
        let mut book = CashBook::default();
        book.record(MovementKind::In, "Apertura", Money::from_cents(10000), Utc::now())
            .unwrap();
        book.record(MovementKind::Out, "Proveedor", Money::from_cents(2550), Utc::now())
            .unwrap();

        let summary = book.summary();
        assert_eq!(summary.total_in.cents(), 10000);
        assert_eq!(summary.total_out.cents(), 2550);
        assert_eq!(summary.balance.cents(), 7450);
    }

    #[test]
    fn test_balance_can_go_negative() {
        let mut book = CashBook::default();
        book.record(MovementKind::Out, "Luz", Money::from_cents(500), Utc::now())
            .unwrap();
        assert_eq!(book.summary().balance.cents(), -500);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut book = CashBook::default();
        for cents in [0, -100] {
            let err = book
                .record(MovementKind::In, "x", Money::from_cents(cents), Utc::now())
                .unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }
        assert!(book.movements().is_empty());
    }

    #[test]
    fn test_description_trimmed() {
        let mut book = CashBook::default();
        let movement = book
            .record(MovementKind::In, "  venta extra ", Money::from_cents(100), Utc::now())
            .unwrap();
        assert_eq!(movement.description, "venta extra");
    }
}

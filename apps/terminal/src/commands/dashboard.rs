//! # Dashboard Command
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ERP - Mi Tienda                                                        │
//! │  Sales today S/. 41.77 │ Net profit S/. 21.77 │ Low stock 2 │ Clients 3 │
//! │                                                                         │
//! │  Dom ████████            S/. 120.00                                     │
//! │  Lun ██                  S/. 30.00                                      │
//! │  ...                                                                    │
//! │  Mar 2025  profit S/. 410.00  cost S/. 900.00                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use tienda_core::{Dashboard, StoreSettings};
use tienda_store::{RecordStore, Register};

use super::Render;
use crate::error::ApiError;

/// Widest bar of the weekly chart, in characters.
const BAR_WIDTH: i64 = 24;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub title: String,
    pub today: String,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

impl Render for DashboardResponse {
    fn render(&self, settings: &StoreSettings) -> String {
        let kpis = &self.dashboard.kpis;
        let mut out = format!("{}  ({})\n", self.title, self.today);
        out.push_str(&format!(
            "Sales today {} | Net profit {} | Low stock {} | Clients {}\n\n",
            settings.format_currency(kpis.sales_today),
            settings.format_currency(kpis.net_profit),
            kpis.low_stock_count,
            kpis.client_count
        ));

        out.push_str("Weekly sales\n");
        let peak = self
            .dashboard
            .weekly_sales
            .iter()
            .map(|day| day.total.cents())
            .max()
            .unwrap_or(0);
        for day in &self.dashboard.weekly_sales {
            let width = if peak > 0 {
                (day.total.cents().max(0) * BAR_WIDTH / peak) as usize
            } else {
                0
            };
            out.push_str(&format!(
                "  {:<4}{:<w$} {}\n",
                day.label,
                "█".repeat(width),
                settings.format_currency(day.total),
                w = BAR_WIDTH as usize
            ));
        }

        out.push_str("\nMonthly profit");
        if self.dashboard.monthly_profit.is_empty() {
            out.push_str("\n  no sales yet");
        }
        for month in &self.dashboard.monthly_profit {
            out.push_str(&format!(
                "\n  {:<9} profit {:>14}  cost {:>14}",
                month.label,
                settings.format_currency(month.profit),
                settings.format_currency(month.cost)
            ));
        }
        out
    }
}

/// Computes the dashboard for `today` (UTC calendar day).
pub fn dashboard<S: RecordStore>(
    register: &Register<S>,
    today: NaiveDate,
) -> Result<DashboardResponse, ApiError> {
    debug!(%today, "dashboard command");
    Ok(DashboardResponse {
        title: register.settings().app_title(),
        today: today.to_string(),
        dashboard: register.dashboard(today)?,
    })
}

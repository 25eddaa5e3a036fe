//! # Dashboard Reports
//!
//! KPI cards and chart series for the back-office dashboard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales today │  Net profit  │  Low stock   │  Clients                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Weekly sales (Dom..Sáb)     │  Monthly profit vs cost                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of loaded records and an explicit
//! `today`, so tests can pin the calendar.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Sale};

/// Short Spanish weekday labels, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

/// Short Spanish month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// The four KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardKpis {
    /// Σ total of sales dated `today` (UTC).
    pub sales_today: Money,
    /// Σ (total - cost) over every sale.
    pub net_profit: Money,
    /// Products with stock at or below their minimum.
    pub low_stock_count: usize,
    pub client_count: usize,
}

impl DashboardKpis {
    pub fn compute(products: &[Product], sales: &[Sale], client_count: usize, today: NaiveDate) -> Self {
        DashboardKpis {
            sales_today: sales_on(sales, today),
            net_profit: sales.iter().map(Sale::profit).sum(),
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
            client_count,
        }
    }
}

/// One bar of the weekly sales chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySales {
    pub label: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
}

/// Sales per weekday, Sunday through Saturday.
///
/// Each weekday maps to its most recent date on or before `today`, so the
/// series always covers the last seven days.
pub fn weekly_sales(sales: &[Sale], today: NaiveDate) -> Vec<DailySales> {
    let today_index = today.weekday().num_days_from_sunday() as i64;

    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let back = (today_index - index as i64 + 7) % 7;
            let date = today - Duration::days(back);
            DailySales {
                label: label.to_string(),
                date,
                total: sales_on(sales, date),
            }
        })
        .collect()
}

/// One group of the monthly profit chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyProfit {
    /// `"<Mon> <year>"`, e.g. `"Mar 2025"`.
    pub label: String,
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub profit: Money,
    pub cost: Money,
}

/// Profit and cost per calendar month that has sales, oldest first.
pub fn monthly_profit(sales: &[Sale]) -> Vec<MonthlyProfit> {
    let mut months: BTreeMap<(i32, u32), (Money, Money)> = BTreeMap::new();

    for sale in sales {
        let date = sale.date.date_naive();
        let entry = months.entry((date.year(), date.month())).or_default();
        entry.0 += sale.profit();
        entry.1 += sale.cost;
    }

    months
        .into_iter()
        .map(|((year, month), (profit, cost))| MonthlyProfit {
            label: format!("{} {}", MONTH_LABELS[(month - 1) as usize], year),
            year,
            month,
            profit,
            cost,
        })
        .collect()
}

/// Everything the dashboard view shows, in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Dashboard {
    pub kpis: DashboardKpis,
    pub weekly_sales: Vec<DailySales>,
    pub monthly_profit: Vec<MonthlyProfit>,
}

impl Dashboard {
    pub fn compute(products: &[Product], sales: &[Sale], client_count: usize, today: NaiveDate) -> Self {
        Dashboard {
            kpis: DashboardKpis::compute(products, sales, client_count, today),
            weekly_sales: weekly_sales(sales, today),
            monthly_profit: monthly_profit(sales),
        }
    }
}

fn sales_on(sales: &[Sale], date: NaiveDate) -> Money {
    sales
        .iter()
        .filter(|sale| sale.date.date_naive() == date)
        .map(|sale| sale.total)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Margin, ProductDraft};
    use chrono::{TimeZone, Utc};

    fn sale(id: &str, y: i32, m: u32, d: u32, total: i64, cost: i64) -> Sale {
        Sale {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap(),
            total: Money::from_cents(total),
            cost: Money::from_cents(cost),
            items: Vec::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_kpis() {
        let products = vec![
            ProductDraft::new("A", "A", Money::zero(), Margin::default(), 1, 2).build().unwrap(),
            ProductDraft::new("B", "B", Money::zero(), Margin::default(), 9, 2).build().unwrap(),
        ];
        let sales = vec![
            sale("SALE-1", 2025, 3, 14, 4177, 2000),
            sale("SALE-2", 2025, 3, 13, 1000, 600),
        ];

        let kpis = DashboardKpis::compute(&products, &sales, 3, date(2025, 3, 14));
        assert_eq!(kpis.sales_today.cents(), 4177);
        assert_eq!(kpis.net_profit.cents(), 2577);
        assert_eq!(kpis.low_stock_count, 1);
        assert_eq!(kpis.client_count, 3);
    }

    #[test]
    fn test_weekly_sales_maps_weekdays() {
        // 2025-03-14 is a Friday.
        let sales = vec![
            sale("SALE-1", 2025, 3, 14, 500, 0),
            sale("SALE-2", 2025, 3, 9, 300, 0),  // previous Sunday
            sale("SALE-3", 2025, 3, 8, 999, 0),  // last Saturday
        ];

        let week = weekly_sales(&sales, date(2025, 3, 14));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].label, "Dom");
        assert_eq!(week[0].date, date(2025, 3, 9));
        assert_eq!(week[0].total.cents(), 300);
        assert_eq!(week[5].date, date(2025, 3, 14));
        assert_eq!(week[5].total.cents(), 500);
        // Saturday resolves to the day before the Sunday shown.
        assert_eq!(week[6].date, date(2025, 3, 8));
        assert_eq!(week[6].total.cents(), 999);
    }

    #[test]
    fn test_monthly_profit_sorted_with_labels() {
        let sales = vec![
            sale("SALE-1", 2025, 1, 5, 1000, 400),
            sale("SALE-2", 2024, 12, 31, 500, 100),
            sale("SALE-3", 2025, 1, 20, 300, 200),
        ];

        let months = monthly_profit(&sales);
        let labels: Vec<&str> = months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Dic 2024", "Ene 2025"]);
        assert_eq!(months[1].profit.cents(), 700);
        assert_eq!(months[1].cost.cents(), 600);
    }

    #[test]
    fn test_empty_inputs() {
        let kpis = DashboardKpis::compute(&[], &[], 0, date(2025, 1, 1));
        assert!(kpis.sales_today.is_zero());
        assert!(monthly_profit(&[]).is_empty());
        assert!(weekly_sales(&[], date(2025, 1, 1)).iter().all(|d| d.total.is_zero()));
    }
}

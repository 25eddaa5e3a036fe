//! # Shell Commands Module
//!
//! Every command the shell can run, grouped by screen.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (Render / Response traits, arg parsing)
//! ├── product.rs    ◄─── Catalog list, grid, CRUD, restock, price preview
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── sale.rs       ◄─── Checkout and sales history
//! ├── client.rs     ◄─── Client registry
//! ├── cash.rs       ◄─── Cash book
//! ├── dashboard.rs  ◄─── KPIs and charts
//! ├── settings.rs   ◄─── Store name and currency
//! └── tools.rs      ◄─── Break-even and profit simulation
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shell Command Flow                                   │
//! │                                                                         │
//! │  tienda> add X1                                                         │
//! │         │                                                               │
//! │         │ (split + clap parse, shell.rs)                                │
//! │         ▼                                                               │
//! │  pub fn add_to_cart<S: RecordStore>(                                    │
//! │      register: &mut Register<S>,  ◄── Owned by the shell               │
//! │      sku: &str,                   ◄── From the command line            │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ Render (text)  or  serde_json (--json)                        │
//! │         ▼                                                               │
//! │  Cart (2 units) ...                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Command functions are generic over the record store so the shell can be
//! driven against `MemoryStore` in tests.

pub mod cart;
pub mod cash;
pub mod client;
pub mod dashboard;
pub mod product;
pub mod sale;
pub mod settings;
pub mod tools;

use serde::Serialize;
use tienda_core::{Margin, Money, StoreSettings};

use crate::error::ApiError;

/// Human-readable rendering of a response.
pub trait Render {
    fn render(&self, settings: &StoreSettings) -> String;
}

/// A command result the shell can print either way.
pub trait Response: Render {
    fn to_json(&self) -> serde_json::Result<String>;
}

impl<T: Serialize + Render> Response for T {
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Parses a decimal amount argument (`"17.70"`).
pub(crate) fn parse_money(field: &str, text: &str) -> Result<Money, ApiError> {
    text.parse::<Money>().map_err(|_| {
        ApiError::validation(format!(
            "{} must be a decimal amount with at most 2 decimals, got '{}'",
            field,
            text.trim()
        ))
    })
}

/// Parses a percentage argument (`"50"`, `"12.5"`).
pub(crate) fn parse_margin(text: &str) -> Result<Margin, ApiError> {
    Ok(text.parse::<Margin>()?)
}

/// Joins trailing words of a command (`products agua mineral`).
pub(crate) fn join_words(words: &[String]) -> String {
    words.join(" ")
}

/// Cuts a display string to `width` characters.
pub(crate) fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("cost", " 17.7 ").unwrap().cents(), 1770);
        let err = parse_money("cost", "1.234").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("cost"));
    }

    #[test]
    fn test_parse_margin() {
        assert_eq!(parse_margin("12.5").unwrap().bps(), 1250);
        assert!(parse_margin("-1").is_err());
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("Arroz", 10), "Arroz");
        assert_eq!(fit("Leche evaporada 400g", 8), "Leche e…");
    }
}

//! # Settings Commands
//!
//! Store name and currency symbol. Both live in the record store, so a
//! change survives restarts.

use serde::Serialize;
use tracing::debug;

use tienda_core::StoreSettings;
use tienda_store::{RecordStore, Register};

use super::Render;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: StoreSettings,
    pub title: String,
}

impl SettingsResponse {
    fn of(settings: &StoreSettings) -> Self {
        SettingsResponse {
            settings: settings.clone(),
            title: settings.app_title(),
        }
    }
}

impl Render for SettingsResponse {
    fn render(&self, _settings: &StoreSettings) -> String {
        format!(
            "{}\nStore name: {}\nCurrency:   {}",
            self.title, self.settings.store_name, self.settings.currency_symbol
        )
    }
}

pub fn get_settings<S: RecordStore>(register: &Register<S>) -> SettingsResponse {
    debug!("get_settings command");
    SettingsResponse::of(register.settings())
}

pub fn set_store_name<S: RecordStore>(
    register: &mut Register<S>,
    name: &str,
) -> Result<SettingsResponse, ApiError> {
    debug!(name = %name, "set_store_name command");
    Ok(SettingsResponse::of(register.set_store_name(name)?))
}

pub fn set_currency_symbol<S: RecordStore>(
    register: &mut Register<S>,
    symbol: &str,
) -> Result<SettingsResponse, ApiError> {
    debug!(symbol = %symbol, "set_currency_symbol command");
    Ok(SettingsResponse::of(register.set_currency_symbol(symbol)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tienda_store::MemoryStore;

    #[test]
    fn test_rename_store() {
        let mut register = Register::open(MemoryStore::new());
        let response = set_store_name(&mut register, "Bodega Ana").unwrap();
        assert_eq!(response.title, "ERP - Bodega Ana");

        set_currency_symbol(&mut register, "$").unwrap();
        let text = get_settings(&register).render(register.settings());
        assert!(text.contains("Currency:   $"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut register = Register::open(MemoryStore::new());
        let err = set_store_name(&mut register, "  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_settings(&register).settings, StoreSettings::default());
    }
}

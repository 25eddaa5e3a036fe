//! Back-office operations: clients, cash book, settings and the dashboard.
//!
//! Each write prepares the new collection on a copy, saves it, and only
//! swaps it in once the save succeeded.

use chrono::{NaiveDate, Utc};
use tracing::info;

use tienda_core::validation::validate_setting;
use tienda_core::{
    CashMovement, CashSummary, Client, ClientDraft, Dashboard, Money, MovementKind, StoreSettings,
};

use super::Register;
use crate::error::PosResult;
use crate::store::{RecordStore, RecordStoreExt};

impl<S: RecordStore> Register<S> {
    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        self.clients.clients()
    }

    pub fn search_clients(&self, term: &str) -> Vec<&Client> {
        self.clients.search(term)
    }

    pub fn add_client(&mut self, draft: ClientDraft) -> PosResult<Client> {
        let mut next = self.clients.clone();
        let client = next.add(draft)?.clone();
        self.store.save(next.clients())?;

        self.clients = next;
        info!(id = %client.id, dni = %client.dni, "Client added");
        Ok(client)
    }

    pub fn update_client(&mut self, id: &str, draft: ClientDraft) -> PosResult<Client> {
        let mut next = self.clients.clone();
        let client = next.update(id, draft)?.clone();
        self.store.save(next.clients())?;

        self.clients = next;
        Ok(client)
    }

    pub fn delete_client(&mut self, id: &str) -> PosResult<Client> {
        let mut next = self.clients.clone();
        let client = next.remove(id)?;
        self.store.save(next.clients())?;

        self.clients = next;
        info!(id = %client.id, "Client deleted");
        Ok(client)
    }

    // -------------------------------------------------------------------------
    // Cash book
    // -------------------------------------------------------------------------

    pub fn cash_movements(&self) -> &[CashMovement] {
        self.cash.movements()
    }

    pub fn cash_summary(&self) -> CashSummary {
        self.cash.summary()
    }

    /// Records money entering or leaving the till.
    pub fn record_cash(
        &mut self,
        kind: MovementKind,
        description: &str,
        amount: Money,
    ) -> PosResult<CashMovement> {
        let mut next = self.cash.clone();
        let movement = next.record(kind, description, amount, Utc::now())?.clone();
        self.store.save(next.movements())?;

        self.cash = next;
        info!(kind = %kind, amount = %amount, "Cash movement recorded");
        Ok(movement)
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub fn set_store_name(&mut self, name: &str) -> PosResult<&StoreSettings> {
        let settings = StoreSettings {
            store_name: validate_setting("store name", name)?,
            ..self.settings.clone()
        };
        self.save_settings(settings)
    }

    pub fn set_currency_symbol(&mut self, symbol: &str) -> PosResult<&StoreSettings> {
        let settings = StoreSettings {
            currency_symbol: validate_setting("currency symbol", symbol)?,
            ..self.settings.clone()
        };
        self.save_settings(settings)
    }

    fn save_settings(&mut self, settings: StoreSettings) -> PosResult<&StoreSettings> {
        self.store.save_one(&settings)?;
        info!(store_name = %settings.store_name, currency = %settings.currency_symbol, "Settings saved");
        self.settings = settings;
        Ok(&self.settings)
    }

    // -------------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------------

    /// Dashboard figures from persisted state: durable stock, not live.
    pub fn dashboard(&self, today: NaiveDate) -> PosResult<Dashboard> {
        Ok(Dashboard::compute(
            &self.durable_products()?,
            &self.sales,
            self.clients.len(),
            today,
        ))
    }
}

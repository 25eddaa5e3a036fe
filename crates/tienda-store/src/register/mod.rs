//! # Register
//!
//! The context object for one running point of sale. It owns the inventory
//! ledger, the cart session and the other collections, plus the record store
//! they persist to. There is no ambient state: every operation goes through
//! a `Register` value.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Register<S>                                   │
//! │                                                                         │
//! │   InventoryLedger ◄── CartSession        (live stock, reservations)     │
//! │   Vec<Sale>                              (append-only)                  │
//! │   ClientRegistry, CashBook, StoreSettings                               │
//! │   Rc<EventBus>                           (StockChanged, SaleFinalized)  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   S: RecordStore                         (durable view only)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Durable View
//! Live stock has the cart's reservations subtracted. Whenever the catalog
//! is saved outside of [`Register::finalize`], reserved units are added back,
//! so a reservation never reaches the store before the sale does. Killing
//! the process with a full cart therefore loses nothing: the next `open`
//! starts from the unreserved stock.
//!
//! Operations are split across files by area: `catalog`, `checkout` and
//! `backoffice`.

mod backoffice;
mod catalog;
mod checkout;

use std::rc::Rc;

use tracing::info;

use tienda_core::{
    CartSession, CashBook, ClientRegistry, CoreError, DomainEvent, EventBus, InventoryLedger,
    Product, Sale, StoreSettings, SubscriptionId, ValidationError, SALE_ID_PREFIX,
};

use crate::error::PosResult;
use crate::store::{RecordStore, RecordStoreExt};

/// One running point of sale over a record store.
#[derive(Debug)]
pub struct Register<S: RecordStore> {
    store: S,
    events: Rc<EventBus>,
    ledger: InventoryLedger,
    cart: CartSession,
    sales: Vec<Sale>,
    clients: ClientRegistry,
    cash: CashBook,
    settings: StoreSettings,
    /// Millis of the last issued sale id; ids never repeat or go backwards.
    last_sale_millis: i64,
}

impl<S: RecordStore> Register<S> {
    /// Loads every collection from the store. Never fails: missing or
    /// malformed keys start empty.
    pub fn open(store: S) -> Self {
        let events = EventBus::shared();
        let products: Vec<Product> = store.load();
        let sales: Vec<Sale> = store.load();
        let clients = ClientRegistry::new(store.load());
        let cash = CashBook::new(store.load());
        let settings: StoreSettings = store.load_one();

        let last_sale_millis = sales
            .iter()
            .filter_map(|sale| sale_id_millis(&sale.id))
            .max()
            .unwrap_or(0);

        info!(
            products = products.len(),
            sales = sales.len(),
            clients = clients.len(),
            store_name = %settings.store_name,
            "Register opened"
        );

        Register {
            ledger: InventoryLedger::new(products, Rc::clone(&events)),
            events,
            store,
            cart: CartSession::new(),
            sales,
            clients,
            cash,
            settings,
            last_sale_millis,
        }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Registers a listener for stock and sale events.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn cart(&self) -> &CartSession {
        &self.cart
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access, for tests that inject faults.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the register, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The catalog as it should be persisted: live stock plus whatever the
    /// cart currently holds.
    ///
    /// ## Errors
    /// `Validation` if a product's stock plus its reservation overflows.
    pub fn durable_products(&self) -> PosResult<Vec<Product>> {
        self.ledger
            .products()
            .iter()
            .map(|product| {
                let reserved = self.cart.reserved(&product.sku);
                let stock = product.stock.checked_add(reserved).ok_or_else(|| {
                    CoreError::from(ValidationError::OutOfRange {
                        field: "stock".to_string(),
                        min: 0,
                        max: u32::MAX as i64,
                    })
                })?;
                Ok(Product {
                    stock,
                    ..product.clone()
                })
            })
            .collect()
    }
}

/// Parses the millis out of a `SALE-<millis>` id.
fn sale_id_millis(id: &str) -> Option<i64> {
    id.strip_prefix(SALE_ID_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

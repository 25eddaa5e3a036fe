//! # Domain Events
//!
//! Synchronous notifications for collaborators that mirror core state
//! (dashboard, product grid). The core never awaits or depends on how a
//! listener handles an event.
//!
//! ```text
//! InventoryLedger ──StockChanged──┐
//!                                 ├──► EventBus ──► listener 1 (grid)
//! Register::finalize ─SaleFinalized┘              └► listener 2 (dashboard)
//! ```
//!
//! The bus is single-threaded (`Rc`/`RefCell`): every event is delivered
//! before the operation that emitted it returns.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;

/// Something observers may want to redraw for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum DomainEvent {
    /// A product's live stock changed (reservation, release, restock, edit).
    StockChanged { sku: String, stock: u32 },
    /// A product left the catalog.
    ProductRemoved { sku: String },
    /// A cart became a durable sale.
    SaleFinalized {
        #[serde(rename = "saleId")]
        sale_id: String,
        total: Money,
    },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&DomainEvent)>;

/// Registry of event listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Creates an empty bus, ready to be shared.
    pub fn shared() -> Rc<Self> {
        Rc::new(EventBus::default())
    }

    /// Registers a listener; it receives every event emitted afterwards.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Delivers an event to every listener, in subscription order.
    ///
    /// Listeners may subscribe or unsubscribe from inside the callback;
    /// such changes apply from the next event on.
    pub fn emit(&self, event: &DomainEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

//! End-to-end checkout over a real data directory.

use tempfile::TempDir;

use tienda_core::{CoreError, Margin, Money, Product, ProductDraft, Sale};
use tienda_store::{JsonFileStore, PosError, RecordKey, RecordStore, RecordStoreExt, Register};

fn open(dir: &TempDir) -> Register<JsonFileStore> {
    Register::open(JsonFileStore::open(dir.path()).unwrap())
}

fn seed_x1(dir: &TempDir) {
    let mut register = open(dir);
    register
        .add_product(ProductDraft::new(
            "X1",
            "Gaseosa 500ml",
            Money::from_cents(1000),
            Margin::from_percent(50),
            5,
            1,
        ))
        .unwrap();
}

fn stock(register: &Register<JsonFileStore>, sku: &str) -> u32 {
    register.ledger().find_by_sku(sku).unwrap().stock
}

#[test]
fn test_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    seed_x1(&dir);

    let mut register = open(&dir);
    assert_eq!(register.ledger().find_by_sku("X1").unwrap().price.cents(), 1770);

    register.add_to_cart("X1").unwrap();
    register.add_to_cart("X1").unwrap();
    assert_eq!(stock(&register, "X1"), 3);

    let totals = register.totals();
    assert_eq!(
        (totals.subtotal.cents(), totals.tax.cents(), totals.total.cents()),
        (3540, 637, 4177)
    );

    let sale = register.finalize().unwrap();
    assert_eq!(sale.total.cents(), 4177);
    assert_eq!(sale.cost.cents(), 2000);
    assert_eq!(stock(&register, "X1"), 3);
    assert!(register.cart().is_empty());

    // A fresh process sees the sale and the consumed stock.
    let reopened = open(&dir);
    assert_eq!(reopened.sales(), &[sale]);
    assert_eq!(stock(&reopened, "X1"), 3);
}

#[test]
fn test_reload_recovers_abandoned_reservations() {
    let dir = TempDir::new().unwrap();
    seed_x1(&dir);

    let mut register = open(&dir);
    register.add_to_cart("X1").unwrap();
    register.add_to_cart("X1").unwrap();
    register.add_to_cart("X1").unwrap();
    // Catalog writes while the cart is full must not persist reservations.
    register.restock("X1", 1).unwrap();
    assert_eq!(stock(&register, "X1"), 3);
    drop(register);

    let reopened = open(&dir);
    assert_eq!(stock(&reopened, "X1"), 6);
    assert!(reopened.cart().is_empty());
    assert!(reopened.sales().is_empty());
}

#[test]
fn test_round_trip_add_three_remove_line() {
    let dir = TempDir::new().unwrap();
    seed_x1(&dir);

    let mut register = open(&dir);
    for _ in 0..3 {
        register.add_to_cart("X1").unwrap();
    }
    let removed = register.remove_from_cart("X1").unwrap();
    assert_eq!(removed.quantity, 3);
    assert_eq!(stock(&register, "X1"), 5);
    assert_eq!(register.cart().reserved("X1"), 0);
}

#[test]
fn test_sold_out_product_cannot_be_added() {
    let dir = TempDir::new().unwrap();
    seed_x1(&dir);

    let mut register = open(&dir);
    for _ in 0..5 {
        register.add_to_cart("X1").unwrap();
    }
    let err = register.add_to_cart("X1").unwrap_err();
    assert_eq!(
        err,
        PosError::Core(CoreError::OutOfStock {
            sku: "X1".to_string()
        })
    );
    assert_eq!(register.cart().reserved("X1"), 5);
}

#[test]
fn test_empty_checkout_leaves_ledger_unchanged() {
    let dir = TempDir::new().unwrap();
    seed_x1(&dir);

    let mut register = open(&dir);
    assert_eq!(register.finalize().unwrap_err(), PosError::Core(CoreError::EmptyCart));
    assert_eq!(register.store().read(RecordKey::Sales).unwrap(), None);
}

#[test]
fn test_corrupt_sales_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    seed_x1(&dir);
    std::fs::write(dir.path().join("sales.json"), "[{\"id\":").unwrap();

    let mut register = open(&dir);
    assert!(register.sales().is_empty());

    register.add_to_cart("X1").unwrap();
    register.finalize().unwrap();
    let stored: Vec<Sale> = register.store().load();
    assert_eq!(stored.len(), 1);
    let products: Vec<Product> = register.store().load();
    assert_eq!(products[0].stock, 4);
}

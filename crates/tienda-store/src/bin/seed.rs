//! # Seed Data Generator
//!
//! Populates a data directory with a demo catalog, clients and cash
//! movements for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./tienda_data (default)
//! cargo run -p tienda-store --bin seed
//!
//! # Specify data directory
//! cargo run -p tienda-store --bin seed -- --dir ./data
//!
//! # Replace an existing catalog
//! cargo run -p tienda-store --bin seed -- --force
//! ```
//!
//! ## Generated Data
//! - Products across categories (beverages, snacks, grocery, cleaning),
//!   SKU `{CATEGORY}-{INDEX}`, some of them at or below minimum stock
//! - A handful of clients with DNI and phone
//! - An opening cash deposit and one expense

use std::env;

use chrono::Utc;
use tienda_core::{
    CashBook, ClientDraft, ClientRegistry, Margin, Money, MovementKind, Product, ProductDraft,
    StoreSettings,
};
use tienda_store::{JsonFileStore, RecordStoreExt};

/// (category code, [(name, cost in cents, margin %, stock, min stock)])
const CATALOG: &[(&str, &[(&str, i64, u32, u32, u32)])] = &[
    (
        "BEB",
        &[
            ("Gaseosa 500ml", 150, 40, 48, 12),
            ("Gaseosa 1.5L", 380, 35, 24, 6),
            ("Agua mineral 625ml", 90, 60, 60, 12),
            ("Jugo de naranja 1L", 420, 30, 10, 4),
            ("Cerveza lata 355ml", 310, 45, 36, 12),
        ],
    ),
    (
        "SNK",
        &[
            ("Papas fritas 45g", 120, 50, 30, 10),
            ("Galletas de soda", 80, 50, 40, 10),
            ("Chocolate 30g", 150, 60, 3, 5),
            ("Maní salado 100g", 200, 40, 15, 5),
        ],
    ),
    (
        "ABR",
        &[
            ("Arroz 1kg", 380, 15, 50, 10),
            ("Azúcar rubia 1kg", 350, 15, 40, 10),
            ("Aceite vegetal 1L", 780, 20, 20, 5),
            ("Leche evaporada 400g", 330, 20, 2, 6),
            ("Fideos 500g", 260, 25, 35, 8),
        ],
    ),
    (
        "LIM",
        &[
            ("Detergente 500g", 520, 30, 12, 4),
            ("Jabón de tocador", 210, 40, 18, 6),
            ("Papel higiénico x4", 590, 25, 0, 4),
        ],
    ),
];

/// (dni, name, phone)
const CLIENTS: &[(&str, &str, &str)] = &[
    ("44556677", "Ana Torres", "987654321"),
    ("11223344", "Luis Pérez", "912345678"),
    ("70809010", "Rosa Quispe", "956123789"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut data_dir = String::from("./tienda_data");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Tienda POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --dir <PATH>   Data directory (default: ./tienda_data)");
                println!("  -f, --force        Overwrite an existing catalog");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tienda POS Seed Data Generator");
    println!("=================================");
    println!("Data directory: {}", data_dir);
    println!();

    let mut store = JsonFileStore::open(&data_dir)?;

    // Check existing products
    let existing: Vec<Product> = store.load();
    if !existing.is_empty() && !force {
        println!("⚠ Data directory already has {} products", existing.len());
        println!("  Skipping seed to avoid overwriting them.");
        println!("  Run with --force to replace the demo data.");
        return Ok(());
    }

    // Products
    let mut products = Vec::new();
    for (category, items) in CATALOG {
        for (index, (name, cost, margin, stock, min_stock)) in items.iter().enumerate() {
            let draft = ProductDraft::new(
                format!("{}-{:03}", category, index + 1),
                *name,
                Money::from_cents(*cost),
                Margin::from_percent(*margin),
                *stock,
                *min_stock,
            );
            products.push(draft.build()?);
        }
    }
    store.save(&products)?;
    let low = products.iter().filter(|p| p.is_low_stock()).count();
    println!("✓ {} products ({} at or below minimum stock)", products.len(), low);

    // Clients
    let mut clients = ClientRegistry::default();
    for (dni, name, phone) in CLIENTS {
        clients.add(ClientDraft {
            dni: dni.to_string(),
            name: name.to_string(),
            phone: Some(phone.to_string()),
            email: None,
        })?;
    }
    store.save(clients.clients())?;
    println!("✓ {} clients", clients.len());

    // Cash
    let mut cash = CashBook::default();
    cash.record(MovementKind::In, "Fondo de caja inicial", Money::from_cents(20_000), Utc::now())?;
    cash.record(MovementKind::Out, "Bolsas y útiles", Money::from_cents(1_550), Utc::now())?;
    store.save(cash.movements())?;

    let settings: StoreSettings = store.load_one();
    store.save_one(&settings)?;
    println!(
        "✓ {} cash movements, balance {}",
        cash.movements().len(),
        settings.format_currency(cash.summary().balance)
    );

    println!();
    println!("✓ Seed complete: {}", store.dir().display());
    Ok(())
}

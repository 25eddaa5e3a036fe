//! # Tienda Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda POS Terminal                              │
//! │                                                                         │
//! │  main.rs ────► calls tienda_terminal::run()                             │
//! │                                                                         │
//! │  lib.rs ─────► config, logging, Register, shell loop                    │
//! │                                                                         │
//! │  commands/ ──► products, add, checkout, clients, cash, dashboard, ...   │
//! │                                                                         │
//! │  state/ ─────► AppConfig, open_register                                 │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  <data dir>/products.json, sales.json, clients.json,                    │
//! │             cashMovements.json, settings.json                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match tienda_terminal::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tienda: {}", err);
            ExitCode::FAILURE
        }
    }
}

//! # State Module
//!
//! Everything the shell holds for the lifetime of the process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │     AppConfig        │        │     Register<JsonFileStore>      │  │
//! │  │                      │ opens  │                                  │  │
//! │  │  data_dir ───────────┼───────►│  ledger, cart, sales, clients,   │  │
//! │  │  log_filter          │        │  cash book, settings             │  │
//! │  │  json                │        │                                  │  │
//! │  └──────────────────────┘        └──────────────────────────────────┘  │
//! │                                                                         │
//! │  Single-threaded: the shell owns the Register, commands borrow it.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{default_data_dir, AppConfig, Cli, DEFAULT_LOG_FILTER};

use tienda_store::{JsonFileStore, Register};
use tracing::info;

use crate::error::ApiError;

/// Opens the JSON record store in the configured directory and loads the
/// Register from it.
pub fn open_register(config: &AppConfig) -> Result<Register<JsonFileStore>, ApiError> {
    let store = JsonFileStore::open(config.data_dir.clone())?;
    let register = Register::open(store);
    info!(data_dir = %config.data_dir.display(), "Register ready");
    Ok(register)
}

//! # Tienda Terminal Library
//!
//! Core library for the Tienda POS interactive shell.
//!
//! ## Module Organization
//! ```text
//! tienda_terminal/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── shell.rs        ◄─── Line splitting, clap parsing, dispatch, output
//! ├── state/
//! │   ├── mod.rs      ◄─── Opens the Register on the JSON store
//! │   └── config.rs   ◄─── Flags > environment > defaults
//! ├── commands/
//! │   ├── mod.rs      ◄─── Render / Response traits
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── cart.rs     ◄─── Cart commands
//! │   ├── sale.rs     ◄─── Checkout and history
//! │   └── ...         ◄─── Clients, cash, dashboard, settings, tools
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shell::Shell;
use state::{open_register, AppConfig, Cli, DEFAULT_LOG_FILTER};

/// Runs the shell on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse Flags & Resolve Config ─────────────────────────────────────► │
/// │     • --data-dir > TIENDA_DATA_DIR > platform data dir                  │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • --log > TIENDA_LOG > RUST_LOG > "info,tienda=debug"               │
/// │                                                                         │
/// │  3. Open Register ────────────────────────────────────────────────────► │
/// │     • JSON record files in the data directory                           │
/// │     • Malformed files are logged and treated as empty                   │
/// │                                                                         │
/// │  4. Run Shell ────────────────────────────────────────────────────────► │
/// │     • One command per line until quit / end of input                    │
/// │     • Pending cart released on the way out                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_cli(Cli::parse());
    init_tracing(config.log_filter.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Tienda POS");

    let register = open_register(&config)?;
    let mut shell = Shell::new(register, config.json);
    shell.run(io::stdin().lock(), io::stdout().lock())?;

    info!("Tienda POS stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `--log debug` / `TIENDA_LOG=debug` - Explicit filter
/// - `RUST_LOG=tienda_store=trace` - Used when no explicit filter is given
/// - Default: `info,tienda=debug`
///
/// Logs go to stderr so they never interleave with shell output.
fn init_tracing(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

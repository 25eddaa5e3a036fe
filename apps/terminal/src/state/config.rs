//! # Configuration State
//!
//! Application configuration resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--data-dir`, `--log`, `--json`)
//! 2. Environment variables (`TIENDA_DATA_DIR`, `TIENDA_LOG`)
//! 3. Defaults (platform data directory, this file)
//!
//! Store-level settings (store name, currency symbol) are records in the
//! store, not configuration. See `commands::settings`.

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use serde::Serialize;

/// Default log filter when neither `--log`, `TIENDA_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tienda=debug";

/// Startup flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tienda", version, about = "Tienda POS point-of-sale shell")]
pub struct Cli {
    /// Directory holding the JSON record files
    #[arg(long, short = 'd', value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive (e.g. "debug" or "tienda_store=trace")
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Print every response as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Where the record store lives.
    pub data_dir: PathBuf,

    /// Explicit log filter. `None` defers to `RUST_LOG`, then the default.
    pub log_filter: Option<String>,

    /// JSON output for every command.
    pub json: bool,
}

impl AppConfig {
    /// Resolves configuration from flags and the process environment.
    pub fn from_cli(cli: Cli) -> Self {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    /// Resolves configuration with an injectable environment lookup.
    ///
    /// ## Environment Variables
    /// - `TIENDA_DATA_DIR`: Override the data directory
    /// - `TIENDA_LOG`: Override the log filter
    pub fn resolve(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = cli
            .data_dir
            .or_else(|| env("TIENDA_DATA_DIR").filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let log_filter = cli
            .log
            .or_else(|| env("TIENDA_LOG"))
            .filter(|v| !v.trim().is_empty());

        AppConfig {
            data_dir,
            log_filter,
            json: cli.json,
        }
    }
}

/// Platform data directory.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.tienda.pos`
/// - **Windows**: `%APPDATA%\tienda\pos\data`
/// - **Linux**: `~/.local/share/pos`
///
/// Falls back to `./tienda_data` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "tienda", "pos")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./tienda_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(Cli::default(), no_env);
        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.log_filter, None);
        assert!(!config.json);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = |name: &str| match name {
            "TIENDA_DATA_DIR" => Some("/tmp/tienda".to_string()),
            "TIENDA_LOG" => Some("warn".to_string()),
            _ => None,
        };
        let config = AppConfig::resolve(Cli::default(), env);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tienda"));
        assert_eq!(config.log_filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_flags_override_env() {
        let cli = Cli::parse_from(["tienda", "--data-dir", "./mine", "--log", "debug", "--json"]);
        let env = |_: &str| Some("ignored".to_string());
        let config = AppConfig::resolve(cli, env);
        assert_eq!(config.data_dir, PathBuf::from("./mine"));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert!(config.json);
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let env = |_: &str| Some("  ".to_string());
        let config = AppConfig::resolve(Cli::default(), env);
        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.log_filter, None);
    }
}

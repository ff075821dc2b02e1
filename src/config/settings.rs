//! Settings loading from config.toml
//!
//! The file is optional. Every key has a default, so a missing file or a missing
//! section yields a working configuration. `BIND_ADDRESS` in the environment
//! overrides `server.bind_address`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default ceiling for an invoice total on creation
pub const DEFAULT_MAX_TOTAL_AMOUNT: f64 = 1000.0;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP listener settings
    pub server: ServerSettings,
    /// Business rules for invoices
    pub invoices: InvoiceRules,
}

/// HTTP listener settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on
    pub bind_address: String,
    /// Directory holding the built front end, served for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            static_dir: None,
        }
    }
}

/// Business rules for invoices
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct InvoiceRules {
    /// Upper bound for `totalAmount` when creating an invoice
    pub max_total_amount: f64,
}

impl Default for InvoiceRules {
    fn default() -> Self {
        Self {
            max_total_amount: DEFAULT_MAX_TOTAL_AMOUNT,
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - `invoices.max_total_amount` is not a positive number
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text and checks the invoice rules.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if !(settings.invoices.max_total_amount.is_finite() && settings.invoices.max_total_amount > 0.0)
    {
        return Err(Error::Config {
            message: format!(
                "invoices.max_total_amount must be a positive number, got {}",
                settings.invoices.max_total_amount
            ),
        });
    }

    Ok(settings)
}

/// Loads settings from the default location (./config.toml), falling back to
/// defaults when the file does not exist, then applies environment overrides.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    let mut settings = if path.exists() {
        load_settings(path)?
    } else {
        info!("No config.toml found, using default settings.");
        Settings::default()
    };

    if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
        settings.server.bind_address = bind_address;
    }

    Ok(settings)
}

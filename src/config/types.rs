//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::versions::DEFAULT_ALERT_MESSAGE;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store file (`~/` is expanded)
    #[serde(default = "default_store_path")]
    pub path: String,
}

pub fn default_store_path() -> String {
    "~/.local/share/idstore/store.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Migration behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Copy the store to `<path>.bak` before migrating
    #[serde(default = "default_backup")]
    pub backup: bool,
    /// Text of the alert raised when the legacy upgrade cannot be verified
    #[serde(default = "default_alert_message")]
    pub alert_message: String,
}

pub fn default_backup() -> bool {
    true
}

pub fn default_alert_message() -> String {
    DEFAULT_ALERT_MESSAGE.to_string()
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            backup: default_backup(),
            alert_message: default_alert_message(),
        }
    }
}

/// Logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `IDSTORE_LOG` is unset (e.g. "warn", "idstore=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

pub fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

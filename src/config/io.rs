//! Configuration I/O operations

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::types::Config;

/// Get the config file path (~/.config/idstore/config.toml)
pub fn config_path() -> Result<PathBuf> {
    let config_dir = config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Get the config directory path (~/.config/idstore)
fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("idstore"))
}

/// Load configuration from file, or return defaults if not found
pub fn load() -> Result<Config> {
    let config_path = config_path()?;

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        parse(&contents).with_context(|| format!("Failed to parse config file: {:?}", config_path))
    } else {
        Ok(Config::default())
    }
}

/// Parse configuration from TOML text
pub fn parse(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.store.path.trim().is_empty() {
        anyhow::bail!("Invalid config: [store].path must not be empty");
    }
    Ok(config)
}

//! Command handlers for the idstore CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod config;
pub mod connections;
pub mod inspect;
pub mod migrate;
pub mod preview;

use anyhow::{Context, Result};
use std::path::PathBuf;

use idstore::versions::{self, Alert};
use idstore::{AppState, Config, FileStore, KeyValueStore};

/// Pick the store path: explicit flag first, then `[store].path`.
pub fn resolve_store_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.unwrap_or_else(|| config.store_path())
}

/// Open the store at the resolved path.
pub fn open_store(flag: Option<PathBuf>, config: &Config) -> Result<FileStore> {
    let path = resolve_store_path(flag, config);
    FileStore::open(&path).with_context(|| format!("Failed to open store: {}", path.display()))
}

/// Load application state from the current `store@v4` snapshot.
///
/// Bails if the store has not been migrated yet.
pub fn load_current_state(store: &FileStore) -> Result<AppState> {
    if store.get(versions::STORE_V4)?.is_none() {
        anyhow::bail!(
            "Store {} has no {} snapshot. Run `idstore migrate` first.",
            store.path().display(),
            versions::STORE_V4
        );
    }
    let mut state = AppState::new();
    versions::v4::bootstrap(store, versions::STORE_V4, &mut state)?;
    Ok(state)
}

/// Prints the blocking alert to stderr.
pub struct StderrAlert;

impl Alert for StderrAlert {
    fn alert(&mut self, message: &str) {
        eprintln!();
        eprintln!("  !! {}", message);
        eprintln!();
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

//! Inspect command handler

use anyhow::Result;
use humansize::{format_size, BINARY};
use std::path::PathBuf;

use idstore::versions::MARKER_KEYS;
use idstore::{classify, Config, StoreKeySet};

use super::{open_store, truncate_string};

/// Longest key shown before truncation.
const MAX_KEY_WIDTH: usize = 48;

/// Show the store's location, size, keys and detected version.
#[cfg(not(tarpaulin_include))]
pub fn handle(store: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(store, &config)?;

    if !store.exists() {
        println!("Store {} does not exist yet.", store.path().display());
        return Ok(());
    }

    let keys = StoreKeySet::read(&store)?;
    println!(
        "Store: {} ({})",
        store.path().display(),
        format_size(store.size_on_disk(), BINARY)
    );
    println!("   Keys: {}", keys.len());
    for key in keys.iter() {
        let tag = if MARKER_KEYS.contains(&key) {
            "  [marker]"
        } else {
            ""
        };
        println!("     {}{}", truncate_string(key, MAX_KEY_WIDTH), tag);
    }

    let markers: Vec<&str> = MARKER_KEYS
        .iter()
        .copied()
        .filter(|m| keys.contains(m))
        .collect();
    if markers.is_empty() {
        println!("   Markers: none");
    } else {
        println!("   Markers: {}", markers.join(", "));
    }
    println!("   Detected version: {}", classify(&keys));
    Ok(())
}

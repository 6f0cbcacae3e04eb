//! Preview command handler

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use idstore::preview::{ConnectionPreview, RemoteProfile};
use idstore::Config;

use super::{load_current_state, open_store};

/// Print the connection preview for a profile file ('-' means user not found).
#[cfg(not(tarpaulin_include))]
pub fn handle(profile: &str, store: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(store, &config)?;
    let state = load_current_state(&store)?;

    let remote = if profile == "-" {
        None
    } else {
        let contents = fs::read_to_string(profile)
            .with_context(|| format!("Failed to read profile: {}", profile))?;
        let parsed: RemoteProfile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse profile: {}", profile))?;
        Some(parsed)
    };

    let preview =
        ConnectionPreview::build(remote.as_ref(), &state.connections.connections, Utc::now());

    let flagged = if preview.flagged { " (flagged)" } else { "" };
    println!("{}{}", preview.connection_date, flagged);
    println!("   Connections: {}", preview.connections);
    println!("   Groups: {}", preview.groups);
    println!("   Mutual Connections: {}", preview.mutual_connections);
    Ok(())
}

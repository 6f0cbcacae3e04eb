//! Connections command handler

use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

use idstore::display::{from_millis, relative_time, sort_connections, ConnectionsSort, ScoreTier};
use idstore::state::Connection;
use idstore::Config;

use super::{load_current_state, open_store, truncate_string};

const NAME_WIDTH: usize = 24;

/// List connections from the current snapshot.
///
/// Uses `--sort` if given, else the sort saved in the snapshot, else the
/// stored order.
#[cfg(not(tarpaulin_include))]
pub fn handle(store: Option<PathBuf>, sort: Option<ConnectionsSort>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(store, &config)?;
    let state = load_current_state(&store)?;

    let mut connections = state.connections.connections.clone();
    if connections.is_empty() {
        println!("No connections found.");
        return Ok(());
    }

    let saved_sort = state.connections.connections_sort.parse::<ConnectionsSort>().ok();
    if let Some(sort) = sort.or(saved_sort) {
        sort_connections(&mut connections, sort);
    }

    println!("Connections: {}", connections.len());
    for conn in &connections {
        println!("   {}", format_line(conn));
    }
    Ok(())
}

fn format_line(conn: &Connection) -> String {
    let name = truncate_string(conn.name.as_deref().unwrap_or(&conn.id), NAME_WIDTH);
    let score = match conn.score {
        Some(score) => {
            let tier = match ScoreTier::of(score) {
                ScoreTier::High => "high",
                ScoreTier::Low => "low",
            };
            format!("{:>3} ({})", score, tier)
        }
        None => "  - ".to_string(),
    };
    let connected = conn
        .connection_date
        .and_then(from_millis)
        .map(|date| format!("Connected {}", relative_time(date, Utc::now())))
        .unwrap_or_default();

    format!("{:<width$}  {:<10}  {}", name, score, connected, width = NAME_WIDTH)
}

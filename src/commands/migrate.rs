//! Migrate command handler

use anyhow::Result;
use std::path::PathBuf;

use idstore::{persist_state, AppState, Config, MigrationOutcome, SchemaVersion, VersionMigrator};

use super::{open_store, StderrAlert};

/// Detect the store version, run its upgrade and save the resulting state.
///
/// A store that is already at v4 is only read, never rewritten. A failed
/// migration is reported as an error so the process exits non-zero.
#[cfg(not(tarpaulin_include))]
pub fn handle(store: Option<PathBuf>, no_backup: bool, dry_run: bool) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(store, &config)?;

    if !dry_run && config.migration.backup && !no_backup && store.backup()? {
        println!("Backup written to {}", store.backup_path().display());
    }

    let migrator = VersionMigrator::new().with_alert_message(config.migration.alert_message.clone());
    let mut state = AppState::new();
    let outcome = migrator.migrate(&store, &mut state, &mut StderrAlert);

    match outcome {
        MigrationOutcome::Upgraded(SchemaVersion::V4) => {
            println!(
                "Store at {} is already v4, nothing written.",
                store.path().display()
            );
            print_counts(&state);
            Ok(())
        }
        MigrationOutcome::Upgraded(version) => {
            if dry_run {
                println!("Dry run: {} store would be upgraded (nothing written).", version);
            } else {
                persist_state(&mut store, &state)?;
                println!("Upgraded {} store at {}", version, store.path().display());
            }
            print_counts(&state);
            Ok(())
        }
        MigrationOutcome::Skipped => {
            println!("Store is empty, nothing to migrate.");
            Ok(())
        }
        MigrationOutcome::Failed(err) => anyhow::bail!("Migration failed: {}", err),
    }
}

fn print_counts(state: &AppState) {
    println!(
        "   Connections: {}  Groups: {}  Apps: {}",
        state.connections.connections.len(),
        state.groups.len(),
        state.apps.len()
    );
}

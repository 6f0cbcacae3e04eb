//! CLI definitions for idstore
//!
//! The clap structure lives in the library so tests (and any doc tooling)
//! can inspect it without running the binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::display::ConnectionsSort;

/// Version string shown by `--version`, with the git SHA on dev builds.
#[cfg(not(feature = "release"))]
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");
#[cfg(feature = "release")]
pub const LONG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "idstore")]
#[command(about = "Detect, upgrade and inspect the local identity store")]
#[command(
    long_about = "idstore - versioned local storage for an identity verification client.

The store is a JSON key-value file. Its schema version is detected from
marker keys (store@v4, store@v1, or none for the legacy layout) and the
matching one-time upgrade is run.

QUICK START:
    idstore inspect                Show keys and detected version
    idstore migrate                Upgrade the store to the current layout
    idstore connections            List connections from the current snapshot"
)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the store version and run its upgrade
    #[command(long_about = "Detect the store version and run the matching upgrade.

A copy of the store is written to <store>.bak first unless disabled.
On success the resulting state is saved under store@v4, so running
migrate again only re-reads that snapshot.

EXAMPLES:
    idstore migrate
    idstore migrate --store ./store.json --no-backup
    idstore migrate --dry-run")]
    Migrate {
        /// Store file (defaults to [store].path from config)
        #[arg(long, short)]
        store: Option<PathBuf>,
        /// Skip the pre-migration backup
        #[arg(long)]
        no_backup: bool,
        /// Run the upgrade without writing anything back
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the store's keys and detected version
    Inspect {
        /// Store file (defaults to [store].path from config)
        #[arg(long, short)]
        store: Option<PathBuf>,
    },

    /// List connections from the current snapshot
    Connections {
        /// Store file (defaults to [store].path from config)
        #[arg(long, short)]
        store: Option<PathBuf>,
        /// Sort order (e.g. byNameAscending, byScoreDescending)
        #[arg(long)]
        sort: Option<ConnectionsSort>,
    },

    /// Preview a connection from a profile JSON file
    #[command(long_about = "Summarise a remote user's profile before connecting.

PROFILE is the JSON returned by the node for that user. Pass '-' for
'user not found'. Mutual connections are counted against the local store.

EXAMPLE:
    idstore preview profile.json")]
    Preview {
        /// Profile JSON file, or '-' for an unknown user
        profile: String,
        /// Store file (defaults to [store].path from config)
        #[arg(long, short)]
        store: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Print the config file location
    Path,
}

//! idstore library
//!
//! Versioned local storage for an identity verification client: detects
//! which schema a key-value store was written with, runs the matching
//! one-time upgrade, and keeps the resulting application state.

pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod preview;
pub mod state;
pub mod store;
pub mod versions;

pub use config::Config;
pub use state::{Action, AppState, Dispatch};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreKeySet};
pub use versions::{
    classify, persist_state, Alert, MigrationError, MigrationOutcome, SchemaVersion,
    VersionMigrator,
};

//! Key-value storage consumed by the version migrator.
//!
//! Values are opaque strings (usually JSON), keyed by plain string keys.
//! Two backends are provided: [`MemoryStore`] for tests and dry runs, and
//! [`FileStore`] which keeps the whole map in a single JSON file.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is not a valid key-value document: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value interface, modelled on a mobile async storage API.
pub trait KeyValueStore {
    /// List every key currently present.
    fn all_keys(&self) -> Result<Vec<String>, StoreError>;

    /// Read a single value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read several values at once, preserving the order of `keys`.
    fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StoreError> {
        keys.iter()
            .map(|key| Ok((key.clone(), self.get(key)?)))
            .collect()
    }

    /// Insert or replace a value.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Immutable snapshot of the keys present in a store.
///
/// Taken once per migration attempt; classification never looks at the
/// store again after the snapshot exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreKeySet {
    keys: BTreeSet<String>,
}

impl StoreKeySet {
    /// Snapshot the keys of `store`.
    pub fn read<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(store.all_keys()?.into_iter().collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StoreKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

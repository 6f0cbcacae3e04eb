//! JSON-file store backend.
//!
//! The whole store is a single JSON object mapping keys to string values.
//! It is read once on open and rewritten on every mutation using a
//! temp+rename so a crash never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// A store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists on disk yet.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size of the backing file in bytes (0 if it does not exist).
    pub fn size_on_disk(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Get the backup path for this store.
    ///
    /// The backup path is the store path with `.bak` appended.
    pub fn backup_path(&self) -> PathBuf {
        let mut backup = self.path.as_os_str().to_owned();
        backup.push(".bak");
        PathBuf::from(backup)
    }

    /// Copy the store file to its backup path if no backup exists yet.
    ///
    /// Returns `Ok(true)` if a new backup was written, `Ok(false)` if one
    /// already existed or there is no store file to back up.
    pub fn backup(&self) -> Result<bool, StoreError> {
        let backup = self.backup_path();
        if backup.exists() || !self.path.exists() {
            return Ok(false);
        }
        fs::copy(&self.path, &backup).map_err(|source| StoreError::Io {
            path: backup.clone(),
            source,
        })?;
        tracing::info!(backup = %backup.display(), "store backup created");
        Ok(true)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        // Temp file lives next to the target so the rename stays on one filesystem
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("store");
        let temp_path = self.path.with_file_name(format!(".{}.tmp", file_name));

        fs::write(&temp_path, content).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(source));
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory in line with what is on disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush() {
            self.entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

//! Synchronous key-value stores holding named text slots.
//!
//! [`KeyValueStore`] mirrors the browser's local storage: string keys, string
//! values, whole-value reads and writes. [`MemoryStore`] keeps slots in process
//! (optionally under a byte quota); [`FileStore`] keeps one file per slot.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{LedgerError, Result};

/// A store of named text slots.
pub trait KeyValueStore {
    /// Read a slot, or `None` if it was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot, replacing whatever it held.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a slot. Deleting an absent slot is not an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store, optionally capped at a total byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the combined size of all keys and values at `bytes`.
    ///
    /// Writes that would exceed the cap fail with
    /// [`LedgerError::QuotaExceeded`] and leave the store unchanged.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(LedgerError::QuotaExceeded {
                    slot: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Directory-backed store: slot `key` lives in `<dir>/<key>.json`.
///
/// Writes land in a temp file in the same directory and are renamed over the
/// slot file, so an interrupted write never leaves a truncated slot behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory the slots are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing slot `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| LedgerError::Io(e.error))?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Slot names become file names, so keep them to a safe alphabet.
fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(LedgerError::InvalidArgument(format!(
            "invalid slot name: {:?}",
            key
        )))
    }
}

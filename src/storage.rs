//! JSON persistence for entries and secrets.
//!
//! Entries and secrets live in two files and always travel together: both are
//! loaded before an operation runs and both are written after it changed
//! anything.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::entry::{Entry, EntryStore};
use crate::error::{MemoryError, Result};
use crate::memory::Memory;
use crate::vault::SecretVault;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub entries: PathBuf,
    pub vault: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Storage {
    paths: StoragePaths,
}

impl Storage {
    pub fn new(entries: impl Into<PathBuf>, vault: impl Into<PathBuf>) -> Self {
        Self {
            paths: StoragePaths {
                entries: entries.into(),
                vault: vault.into(),
            },
        }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Loads both collections. Missing or empty files read as empty.
    pub fn load(&self) -> Result<Memory> {
        let entries: Vec<Entry> = load_json(&self.paths.entries)?.unwrap_or_default();
        let vault: SecretVault = load_json(&self.paths.vault)?.unwrap_or_default();
        log::debug!(
            "Loaded {} memories and {} secrets",
            entries.len(),
            vault.len()
        );

        let memory = Memory::from_parts(EntryStore::from_entries(entries), vault);
        if let Err(e) = memory.check() {
            log::warn!("Loaded store is inconsistent: {}", e);
        }
        let orphans = memory.orphaned_secrets();
        if !orphans.is_empty() {
            log::warn!("Secrets without a memory: {:?}", orphans);
        }
        Ok(memory)
    }

    /// Writes both collections.
    pub fn save(&self, memory: &Memory) -> Result<()> {
        save_json(&self.paths.entries, memory.entries().entries())?;
        save_json(&self.paths.vault, memory.vault())?;
        log::debug!(
            "Saved {} memories and {} secrets",
            memory.entries().len(),
            memory.vault().len()
        );
        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(MemoryError::persistence(path, e)),
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| MemoryError::persistence(path, io::Error::new(ErrorKind::InvalidData, e)))
}

/// Writes to a sibling temp file, then renames it into place.
fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| MemoryError::persistence(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| MemoryError::persistence(path, io::Error::new(ErrorKind::InvalidData, e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| MemoryError::persistence(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| MemoryError::persistence(path, e))?;
    Ok(())
}

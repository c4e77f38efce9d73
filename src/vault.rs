//! Ciphertext blobs keyed by entry id, kept apart from entry metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretVault {
    records: BTreeMap<u64, String>,
}

impl SecretVault {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub fn from_map(records: BTreeMap<u64, String>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: u64) -> Option<&str> {
        self.records.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    /// Stores `blob` for `id`, returning the blob it replaced.
    pub fn insert(&mut self, id: u64, blob: String) -> Option<String> {
        self.records.insert(id, blob)
    }

    pub fn remove(&mut self, id: u64) -> Option<String> {
        self.records.remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

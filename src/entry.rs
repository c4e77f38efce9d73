//! Entries and the in-memory entry store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, Result};
use crate::vault::SecretVault;

/// Stored in `content` for encrypted entries instead of the plaintext.
pub const ENCRYPTED_PLACEHOLDER: &str = "[encrypted]";

/// Id given to the first entry of an empty store.
pub const FIRST_ID: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub usage_count: u64,
}

impl Entry {
    /// The content safe to show in listings.
    pub fn preview(&self) -> &str {
        if self.encrypted {
            ENCRYPTED_PLACEHOLDER
        } else {
            &self.content
        }
    }
}

/// Ordered collection of entries, persisted as a flat list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `100` for an empty store, otherwise one past the highest id.
    pub fn next_id(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(FIRST_ID, |max| max + 1)
    }

    pub fn add(&mut self, content: String, tags: Vec<String>, encrypted: bool) -> &Entry {
        self.add_at(content, tags, encrypted, Utc::now())
    }

    pub fn add_at(
        &mut self,
        content: String,
        tags: Vec<String>,
        encrypted: bool,
        timestamp: DateTime<Utc>,
    ) -> &Entry {
        let entry = Entry {
            id: self.next_id(),
            content,
            tags: clean_tags(tags),
            timestamp,
            encrypted,
            usage_count: 0,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn find(&self, id: u64) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn touch(&mut self, id: u64) -> Result<u64> {
        let entry = self.find_mut(id).ok_or(MemoryError::NotFound(id))?;
        entry.usage_count += 1;
        Ok(entry.usage_count)
    }

    /// Replaces the tags and, for plain entries, the content.
    ///
    /// Encrypted entries keep their placeholder; the new ciphertext belongs in
    /// the vault.
    pub fn update_content_and_tags(
        &mut self,
        id: u64,
        new_content: Option<String>,
        new_tags: Vec<String>,
    ) -> Result<&Entry> {
        let entry = self.find_mut(id).ok_or(MemoryError::NotFound(id))?;
        if !entry.encrypted {
            if let Some(content) = new_content {
                entry.content = content;
            }
        }
        entry.tags = clean_tags(new_tags);
        Ok(entry)
    }

    pub fn remove(&mut self, id: u64) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Tag frequencies, most used first.
    ///
    /// A tag repeated inside one entry counts once per occurrence. Ties keep
    /// the order in which the tags were first seen.
    pub fn all_tags(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for tag in self.entries.iter().flat_map(|e| e.tags.iter()) {
            match counts.iter_mut().find(|(t, _)| t == tag) {
                Some((_, count)) => *count += 1,
                None => counts.push((tag.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Verifies that encrypted entries only hold the placeholder and have a
    /// vault record, and that ids are unique.
    pub fn check_invariants(&self, vault: &SecretVault) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.id) {
                return Err(duplicate_id(entry.id));
            }
            check_sealed(entry, vault)?;
        }
        Ok(())
    }

    /// Same rules as [`check_invariants`](Self::check_invariants), limited to
    /// the memory `id`.
    pub fn check_entry(&self, id: u64, vault: &SecretVault) -> Result<()> {
        let mut matching = self.entries.iter().filter(|e| e.id == id);
        let entry = matching.next().ok_or(MemoryError::NotFound(id))?;
        if matching.next().is_some() {
            return Err(duplicate_id(id));
        }
        check_sealed(entry, vault)
    }
}

fn duplicate_id(id: u64) -> MemoryError {
    MemoryError::Invariant(format!("duplicate id #{}", id))
}

fn check_sealed(entry: &Entry, vault: &SecretVault) -> Result<()> {
    if !entry.encrypted {
        return Ok(());
    }
    if entry.content != ENCRYPTED_PLACEHOLDER {
        return Err(MemoryError::Invariant(format!(
            "encrypted memory #{} holds plaintext content",
            entry.id
        )));
    }
    if !vault.contains(entry.id) {
        return Err(MemoryError::Invariant(format!(
            "encrypted memory #{} has no secret",
            entry.id
        )));
    }
    Ok(())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

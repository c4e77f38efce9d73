//! The operations behind every memkeep command.
//!
//! [`Memory`] holds the loaded entry store and secret vault. Each operation
//! checks everything that can fail (lookups, passwords, decryption,
//! encryption) before touching either collection, so an error leaves the
//! state exactly as it was.

use crate::crypto;
use crate::entry::{ENCRYPTED_PLACEHOLDER, Entry, EntryStore};
use crate::error::{MemoryError, Result};
use crate::input::{PasswordPrompt, PasswordProvider};
use crate::search::{self, Query};
use crate::vault::SecretVault;

/// A memory about to be added.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub content: String,
    pub tags: Vec<String>,
    pub encrypt: bool,
}

/// Changes to an existing memory. `tags: None` keeps the current tag set.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A memory together with its readable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub entry: Entry,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    entries: EntryStore,
    vault: SecretVault,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(entries: EntryStore, vault: SecretVault) -> Self {
        Self { entries, vault }
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    pub fn vault(&self) -> &SecretVault {
        &self.vault
    }

    pub fn add(&mut self, new: NewEntry, passwords: &mut dyn PasswordProvider) -> Result<Entry> {
        let content = new.content.trim();
        if content.is_empty() {
            return Err(MemoryError::EmptyContent);
        }

        let blob = if new.encrypt {
            let password = passwords.request(PasswordPrompt::NewSecret)?;
            Some(crypto::encrypt(content, &password)?)
        } else {
            None
        };

        let id = self.entries.next_id();
        let entry = self.apply(id, |memory| {
            let stored = match blob {
                Some(blob) => {
                    memory.vault.insert(id, blob);
                    ENCRYPTED_PLACEHOLDER.to_string()
                }
                None => content.to_string(),
            };
            Ok(memory.entries.add(stored, new.tags, new.encrypt).clone())
        })?;

        log::info!(
            "Added memory #{} (encrypted: {}, tags: {:?})",
            entry.id,
            entry.encrypted,
            entry.tags
        );
        Ok(entry)
    }

    pub fn find(&self, query: &Query) -> Result<Vec<Entry>> {
        let found = search::search(self.entries.iter(), query)?;
        log::debug!(
            "Search '{}' (day: {:?}) matched {} of {}",
            query.pattern,
            query.day,
            found.len(),
            self.entries.len()
        );
        Ok(found.into_iter().cloned().collect())
    }

    /// Returns the readable content of a memory and counts the use.
    ///
    /// Encrypted memories are decrypted first; the use is only counted once
    /// decryption succeeded.
    pub fn get(&mut self, id: u64, passwords: &mut dyn PasswordProvider) -> Result<Retrieved> {
        let entry = self.entries.find(id).ok_or(MemoryError::NotFound(id))?;

        let content = if entry.encrypted {
            self.unlock(id, passwords)?.1
        } else {
            entry.content.clone()
        };

        self.entries.touch(id)?;
        let entry = self
            .entries
            .find(id)
            .cloned()
            .ok_or(MemoryError::NotFound(id))?;
        log::info!("Retrieved memory #{} (uses: {})", id, entry.usage_count);
        Ok(Retrieved { entry, content })
    }

    /// Replaces content and/or tags of a memory.
    ///
    /// For encrypted memories the current secret must unlock first; the new
    /// content is sealed again under the same password with a fresh salt and
    /// IV. The encrypted flag never changes.
    pub fn edit(
        &mut self,
        id: u64,
        edit: EntryEdit,
        passwords: &mut dyn PasswordProvider,
    ) -> Result<Entry> {
        let entry = self.entries.find(id).ok_or(MemoryError::NotFound(id))?;
        let encrypted = entry.encrypted;
        let tags = edit.tags.unwrap_or_else(|| entry.tags.clone());

        let content = match edit.content {
            Some(content) => {
                let content = content.trim().to_string();
                if content.is_empty() {
                    return Err(MemoryError::EmptyContent);
                }
                Some(content)
            }
            None => None,
        };

        let (content, blob) = if encrypted {
            let (password, current) = self.unlock(id, passwords)?;
            let plaintext = content.unwrap_or(current);
            (None, Some(crypto::encrypt(&plaintext, &password)?))
        } else {
            (content, None)
        };

        let entry = self.apply(id, |memory| {
            if let Some(blob) = blob {
                memory.vault.insert(id, blob);
            }
            memory
                .entries
                .update_content_and_tags(id, content, tags)
                .cloned()
        })?;
        log::info!("Edited memory #{} (tags: {:?})", id, entry.tags);
        Ok(entry)
    }

    pub fn tags(&self) -> Vec<(String, usize)> {
        self.entries.all_tags()
    }

    /// Removes a memory and its secret, if it has one.
    pub fn delete(&mut self, id: u64) -> Result<Entry> {
        let entry = self.entries.remove(id).ok_or(MemoryError::NotFound(id))?;
        let had_secret = self.vault.remove(id).is_some();
        log::info!("Deleted memory #{} (had secret: {})", id, had_secret);
        Ok(entry)
    }

    /// Runs `change`, then checks memory `id` against the placeholder and
    /// vault rules. On any error the previous state is restored.
    fn apply<T>(&mut self, id: u64, change: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let before = self.clone();
        let result = change(self).and_then(|value| {
            self.entries.check_entry(id, &self.vault)?;
            Ok(value)
        });
        if let Err(e) = &result {
            log::warn!("Rolled back change to memory #{}: {}", id, e);
            *self = before;
        }
        result
    }

    /// Checks the placeholder and vault invariants of the whole store.
    pub fn check(&self) -> Result<()> {
        self.entries.check_invariants(&self.vault)
    }

    /// Vault ids that no memory refers to.
    pub fn orphaned_secrets(&self) -> Vec<u64> {
        self.vault
            .ids()
            .filter(|id| self.entries.find(*id).is_none())
            .collect()
    }

    fn unlock(&self, id: u64, passwords: &mut dyn PasswordProvider) -> Result<(String, String)> {
        let blob = self.vault.get(id).ok_or_else(|| {
            MemoryError::MalformedVaultBlob(format!("no secret stored for #{}", id))
        })?;
        let password = passwords.request(PasswordPrompt::Unlock { id })?;
        let plaintext = crypto::decrypt(blob, &password).inspect_err(|e| {
            log::warn!("Could not unlock memory #{}: {}", id, e);
        })?;
        Ok((password, plaintext))
    }
}

/// Splits a comma separated tag list, dropping empty pieces.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

//! memkeep - a small store for snippets, commands and secrets.
//!
//! Memories are tagged text entries kept in a JSON file. Entries marked as
//! secret are encrypted under their own password and their ciphertext lives in
//! a separate vault file. The library provides the store, search, encryption
//! and an interactive shell; the binary wires them to a command line.

pub mod config;
pub mod crypto;
pub mod date;
pub mod entry;
pub mod error;
pub mod input;
pub mod logging;
pub mod memory;
pub mod render;
pub mod search;
pub mod shell;
pub mod storage;
pub mod trie;
pub mod vault;

pub use config::AppConfig;
pub use entry::{Entry, EntryStore};
pub use error::{MemoryError, Result};
pub use logging::{LogConfig, init_logging};
pub use memory::Memory;
pub use search::Query;
pub use shell::Shell;
pub use storage::Storage;
pub use trie::Trie;
pub use vault::SecretVault;

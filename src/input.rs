//! Password and content collaborators.
//!
//! The memory operations never prompt on their own. They ask a
//! [`PasswordProvider`] for secrets and take content already resolved through
//! a [`ContentSource`], which keeps them usable from tests and the shell.

use std::io::Read;

use crate::error::{MemoryError, Result};

/// Why a password is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPrompt {
    /// Choosing the password for a new secret.
    NewSecret,
    /// Unlocking the secret of an existing memory.
    Unlock { id: u64 },
}

pub trait PasswordProvider {
    fn request(&mut self, prompt: PasswordPrompt) -> Result<String>;
}

/// Prompts on the terminal with hidden input.
#[derive(Debug, Default)]
pub struct TerminalPasswords;

impl PasswordProvider for TerminalPasswords {
    fn request(&mut self, prompt: PasswordPrompt) -> Result<String> {
        match prompt {
            PasswordPrompt::NewSecret => {
                let password = read_hidden("Password for this secret: ")?;
                if password.is_empty() {
                    return Err(MemoryError::Input("password cannot be empty".into()));
                }
                let confirm = read_hidden("Repeat password: ")?;
                if confirm != password {
                    return Err(MemoryError::Input("passwords do not match".into()));
                }
                Ok(password)
            }
            PasswordPrompt::Unlock { id } => read_hidden(&format!("Password for #{}: ", id)),
        }
    }
}

fn read_hidden(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| MemoryError::Input(format!("could not read password: {}", e)))
}

/// Answers every request with the same password.
#[derive(Debug, Clone)]
pub struct FixedPassword(pub String);

impl FixedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }
}

impl PasswordProvider for FixedPassword {
    fn request(&mut self, _prompt: PasswordPrompt) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Where content comes from when it is not given on the command line.
pub trait ContentSource {
    fn read(&mut self) -> Result<String>;
}

/// Reads everything piped to stdin.
#[derive(Debug, Default)]
pub struct StdinSource;

impl ContentSource for StdinSource {
    fn read(&mut self) -> Result<String> {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| MemoryError::Input(format!("could not read stdin: {}", e)))?;
        Ok(buf)
    }
}

/// A source with nothing in it.
#[derive(Debug, Default)]
pub struct NoContent;

impl ContentSource for NoContent {
    fn read(&mut self) -> Result<String> {
        Ok(String::new())
    }
}

/// Reads text from the system clipboard.
#[derive(Debug, Default)]
pub struct ClipboardSource;

impl ContentSource for ClipboardSource {
    fn read(&mut self) -> Result<String> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| MemoryError::Input(format!("clipboard unavailable: {}", e)))?;
        clipboard
            .get_text()
            .map_err(|e| MemoryError::Input(format!("could not read clipboard: {}", e)))
    }
}

/// Where content comes from when none is given as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Arguments,
    Stdin,
    Clipboard,
}

impl ContentOrigin {
    pub fn from_flags(stdin: bool, clipboard: bool) -> Self {
        match (stdin, clipboard) {
            (true, _) => ContentOrigin::Stdin,
            (false, true) => ContentOrigin::Clipboard,
            (false, false) => ContentOrigin::Arguments,
        }
    }

    pub fn source(self) -> Box<dyn ContentSource> {
        match self {
            ContentOrigin::Arguments => Box::new(NoContent),
            ContentOrigin::Stdin => Box::new(StdinSource),
            ContentOrigin::Clipboard => Box::new(ClipboardSource),
        }
    }
}

/// Picks explicit text over the source and trims it.
pub fn resolve_content(explicit: Option<&str>, source: &mut dyn ContentSource) -> Result<String> {
    let raw = match explicit {
        Some(text) => text.to_string(),
        None => source.read()?,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MemoryError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

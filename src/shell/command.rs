//! Command trait, registry and argument helpers for the shell.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::input::PasswordProvider;
use crate::memory::Memory;
use crate::storage::StoragePaths;
use crate::trie::Trie;

use super::completer::Completions;

/// Result of executing a command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Command executed successfully with optional output.
    Success(Option<String>),
    /// Command failed with error message.
    Error(String),
    /// Signal to exit the shell.
    Exit,
    /// Continue without output.
    Continue,
}

impl CommandResult {
    pub fn success(msg: impl Into<String>) -> Self {
        CommandResult::Success(Some(msg.into()))
    }

    pub fn ok() -> Self {
        CommandResult::Success(None)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        CommandResult::Error(msg.into())
    }
}

/// What an argument position completes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Nothing,
    Id,
    Tags,
    Command,
}

/// State available to commands during execution.
pub struct ShellContext<'a> {
    pub memory: &'a mut Memory,
    pub passwords: &'a mut dyn PasswordProvider,
    /// Set when the memory changed and must be saved.
    pub modified: bool,
    pub registry: Option<&'a CommandRegistry>,
    pub paths: Option<&'a StoragePaths>,
    /// Ids and tags offered by the completer, kept in step with `memory`.
    pub completions: &'a mut Completions,
}

impl<'a> ShellContext<'a> {
    pub fn new(
        memory: &'a mut Memory,
        passwords: &'a mut dyn PasswordProvider,
        completions: &'a mut Completions,
    ) -> Self {
        Self {
            memory,
            passwords,
            modified: false,
            registry: None,
            paths: None,
            completions,
        }
    }

    pub fn with_registry(mut self, registry: &'a CommandRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_paths(mut self, paths: &'a StoragePaths) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Flags the memory for saving and refreshes completion words.
    pub fn mark_modified(&mut self) {
        self.modified = true;
        self.completions.refresh(&*self.memory);
    }
}

/// A command that can be executed in the shell.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for the command list.
    fn description(&self) -> &str;

    /// Usage line, e.g. `get <id>`.
    fn usage(&self) -> &str;

    /// Detailed help text.
    fn help(&self) -> &str {
        self.description()
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult;

    /// What the argument being typed completes to.
    ///
    /// `previous` is the argument before it, `position` counts positional
    /// arguments typed so far.
    fn arg_kind(&self, _previous: Option<&str>, _position: usize) -> ArgKind {
        ArgKind::Nothing
    }

    fn min_args(&self) -> usize {
        0
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name())
            .field("description", &self.description())
            .finish()
    }
}

/// Registry of all available commands.
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
    aliases: HashMap<String, String>,
    names: Trie,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
            names: Trie::new(),
        }
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_string();
        self.names.insert(&name);
        for alias in command.aliases() {
            self.aliases.insert(alias.to_string(), name.clone());
            self.names.insert(alias);
        }
        self.commands.insert(name, command);
    }

    /// Looks up a command by name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        let primary = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.commands.get(primary).map(Arc::clone)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.values()
    }

    /// Command names and aliases starting with `prefix`.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        self.names.completions(prefix)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments split into switches, valued options and positionals.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs<'a> {
    pub switches: Vec<&'a str>,
    pub options: HashMap<&'a str, &'a str>,
    pub positional: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn has(&self, switch: &str) -> bool {
        self.switches.contains(&switch)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    /// Positionals joined back into one string, if any.
    pub fn rest(&self) -> Option<String> {
        if self.positional.is_empty() {
            None
        } else {
            Some(self.positional.join(" "))
        }
    }
}

/// Splits `args` using the known switch and option names.
///
/// Names are given in their canonical form; `aliases` maps short spellings
/// such as `-t` to them. A lone `--` ends flag parsing. Unknown dashed words
/// are rejected only before the first positional, so content like
/// `git log --oneline` survives.
pub fn parse_args<'a>(
    args: &[&'a str],
    switches: &[&'a str],
    options: &[&'a str],
    aliases: &[(&str, &'a str)],
) -> Result<ParsedArgs<'a>, String> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        if arg == "--" {
            parsed.positional.extend(iter.by_ref().copied());
            break;
        }
        let name = aliases
            .iter()
            .find(|(short, _)| *short == arg)
            .map(|(_, long)| *long)
            .unwrap_or(arg);

        if let Some(&switch) = switches.iter().find(|s| **s == name) {
            parsed.switches.push(switch);
        } else if let Some(&option) = options.iter().find(|o| **o == name) {
            let value = *iter
                .next()
                .ok_or_else(|| format!("Missing value for {}", option))?;
            parsed.options.insert(option, value);
        } else if parsed.positional.is_empty()
            && arg.starts_with('-')
            && arg.len() > 1
            && arg.parse::<f64>().is_err()
        {
            return Err(format!("Unknown option: {}", arg));
        } else {
            parsed.positional.push(arg);
        }
    }
    Ok(parsed)
}

/// Parses `100` or `#100`.
pub fn parse_id(arg: &str) -> Result<u64, String> {
    arg.trim_start_matches('#')
        .parse()
        .map_err(|_| format!("'{}' is not a memory id", arg))
}

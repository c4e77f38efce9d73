//! Interactive shell built on rustyline.
//!
//! Offers completion of commands, ids and tags, input highlighting, usage
//! hints and a persistent history.

pub mod command;
pub mod commands;
pub mod completer;
pub mod highlighter;
pub mod hints;

use anyhow::{Result, anyhow};
use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::{
    MatchingBracketValidator, ValidationContext, ValidationResult, Validator,
};
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::input::PasswordProvider;
use crate::memory::Memory;
use crate::storage::StoragePaths;

use command::{CommandRegistry, CommandResult, ShellContext};
use commands::register_all;
use completer::{Completions, MemkeepCompleter};
use highlighter::{MemkeepHighlighter, OutputHighlighter};
use hints::MemkeepHinter;

const PROMPT: &str = "memkeep> ";

/// rustyline helper bundling completion, highlighting, hints and validation.
pub struct MemkeepHelper {
    completer: MemkeepCompleter,
    highlighter: MemkeepHighlighter,
    hinter: MemkeepHinter,
    validator: MatchingBracketValidator,
}

impl MemkeepHelper {
    pub fn new(registry: Arc<CommandRegistry>, completions: Arc<RwLock<Completions>>) -> Self {
        Self {
            completer: MemkeepCompleter::new(Arc::clone(&registry), completions),
            highlighter: MemkeepHighlighter::new(Arc::clone(&registry)),
            hinter: MemkeepHinter::new(registry),
            validator: MatchingBracketValidator::new(),
        }
    }
}

impl Completer for MemkeepHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for MemkeepHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        self.highlighter.highlight_prompt(prompt, default)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        self.highlighter.highlight_hint(hint)
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: rustyline::highlight::CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

impl Hinter for MemkeepHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<Self::Hint> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Validator for MemkeepHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        self.validator.validate(ctx)
    }
}

impl Helper for MemkeepHelper {}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// History file; `None` keeps history in memory only.
    pub history_path: Option<PathBuf>,
    pub max_history: usize,
    pub show_welcome: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history_path: None,
            max_history: 1000,
            show_welcome: true,
        }
    }
}

impl ShellConfig {
    pub fn with_history(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }
}

/// The interactive shell.
pub struct Shell {
    registry: Arc<CommandRegistry>,
    /// Shared with the completer.
    completions: Arc<RwLock<Completions>>,
    config: ShellConfig,
}

impl Shell {
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Self {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);

        Self {
            registry: Arc::new(registry),
            completions: Arc::new(RwLock::new(Completions::default())),
            config,
        }
    }

    fn init_completions(&self, memory: &Memory) {
        if let Ok(mut completions) = self.completions.write() {
            completions.refresh(memory);
            log::debug!(
                "Completion words: {} ids, {} tags",
                completions.ids.len(),
                completions.tags.len()
            );
        }
    }

    /// Runs the read-eval loop until `quit` or end of input.
    ///
    /// `save_fn` is called after every command that changed `memory`.
    pub fn run_with_save<F>(
        &self,
        memory: &mut Memory,
        passwords: &mut dyn PasswordProvider,
        paths: &StoragePaths,
        mut save_fn: F,
    ) -> Result<()>
    where
        F: FnMut(&Memory) -> Result<()>,
    {
        self.init_completions(memory);

        let helper = MemkeepHelper::new(Arc::clone(&self.registry), Arc::clone(&self.completions));
        let mut editor: Editor<MemkeepHelper, FileHistory> = Editor::new()?;
        editor.set_helper(Some(helper));
        editor.set_max_history_size(self.config.max_history)?;
        editor.set_history_ignore_dups(true)?;
        editor.set_history_ignore_space(true);

        if let Some(path) = self.config.history_path.as_ref().filter(|p| p.exists()) {
            match editor.load_history(path) {
                Ok(()) => log::debug!("Loaded history from {}", path.display()),
                Err(e) => log::warn!("Could not load history: {}", e),
            }
        }

        if self.config.show_welcome {
            println!(
                "{} memories loaded. Type 'help' for available commands.",
                memory.entries().len()
            );
        }
        log::info!("Shell started");

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line);

                    match self.execute_and_save(line, memory, passwords, paths, &mut save_fn)? {
                        CommandResult::Success(Some(msg)) => println!("{}", msg),
                        CommandResult::Success(None) | CommandResult::Continue => {}
                        CommandResult::Error(msg) => {
                            eprintln!("{}", OutputHighlighter::error(&msg));
                        }
                        CommandResult::Exit => {
                            log::info!("User requested exit");
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("exit");
                    log::info!("EOF received (Ctrl-D)");
                    break;
                }
                Err(err) => {
                    eprintln!("{}", OutputHighlighter::error(&format!("Error: {}", err)));
                    log::error!("Readline error: {}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.config.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match editor.save_history(path) {
                Ok(()) => log::debug!("Saved history to {}", path.display()),
                Err(e) => log::warn!("Failed to save history: {}", e),
            }
        }

        log::info!("Shell exited");
        Ok(())
    }

    /// Executes `line` and hands a changed `memory` to `save_fn`.
    ///
    /// When saving fails the change is undone, so memory never holds
    /// anything the user was told was not stored.
    pub fn execute_and_save<F>(
        &self,
        line: &str,
        memory: &mut Memory,
        passwords: &mut dyn PasswordProvider,
        paths: &StoragePaths,
        save_fn: &mut F,
    ) -> Result<CommandResult>
    where
        F: FnMut(&Memory) -> Result<()>,
    {
        let snapshot = memory.clone();
        let mut completions = self
            .completions
            .write()
            .map_err(|e| anyhow!("Completion lock poisoned: {}", e))?;
        let mut ctx = ShellContext::new(memory, passwords, &mut completions)
            .with_registry(&self.registry)
            .with_paths(paths);
        let result = self.execute_with_context(line, &mut ctx);
        if !ctx.modified {
            return Ok(result);
        }

        match save_fn(memory) {
            Ok(()) => Ok(result),
            Err(e) => {
                log::error!("Failed to save memories: {:#}", e);
                *memory = snapshot;
                completions.refresh(memory);
                Ok(CommandResult::error(format!(
                    "Failed to save, change discarded: {:#}",
                    e
                )))
            }
        }
    }

    /// Parses and executes one command line against `memory`.
    pub fn execute_line(
        &self,
        line: &str,
        memory: &mut Memory,
        passwords: &mut dyn PasswordProvider,
    ) -> CommandResult {
        let mut completions = match self.completions.write() {
            Ok(guard) => guard,
            Err(e) => return CommandResult::error(format!("Completion lock poisoned: {}", e)),
        };
        let mut ctx =
            ShellContext::new(memory, passwords, &mut completions).with_registry(&self.registry);
        self.execute_with_context(line, &mut ctx)
    }

    fn execute_with_context(&self, line: &str, ctx: &mut ShellContext) -> CommandResult {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd_name, args)) = parts.split_first() else {
            return CommandResult::Continue;
        };

        match self.registry.get(cmd_name) {
            Some(cmd) => {
                log::debug!("Executing '{}' with {} args", cmd.name(), args.len());
                let start = Instant::now();
                let result = cmd.execute(args, ctx);
                log::debug!("Command '{}' completed in {:?}", cmd.name(), start.elapsed());
                result
            }
            None => CommandResult::error(format!(
                "Unknown command: '{}'\nType 'help' to see available commands.",
                cmd_name
            )),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

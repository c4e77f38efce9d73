//! Inline hints for the shell.

use rustyline::Context;
use rustyline::hint::Hinter;
use std::sync::Arc;

use crate::shell::command::CommandRegistry;

/// Hints the rest of a command name, or the arguments still missing.
pub struct MemkeepHinter {
    registry: Arc<CommandRegistry>,
}

impl MemkeepHinter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    fn get_hint(&self, line: &str) -> Option<String> {
        let has_trailing_space = line.ends_with(' ');
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (&command, args) = parts.split_first()?;

        if args.is_empty() && !has_trailing_space {
            let completions = self.registry.completions(command);
            return match completions.as_slice() {
                [only] if only.len() > command.len() => Some(only[command.len()..].to_string()),
                _ => None,
            };
        }

        let cmd = self.registry.get(command)?;
        let positional = args.iter().filter(|a| !a.starts_with('-')).count();
        if positional >= cmd.min_args() {
            return None;
        }

        // Required placeholders only; optional ones are left to `help`.
        let required: Vec<&str> = cmd
            .usage()
            .split_whitespace()
            .skip(1)
            .filter(|part| part.starts_with('<') && part.ends_with('>'))
            .collect();
        let remaining = required.get(positional..).filter(|r| !r.is_empty())?;

        let hint = remaining.join(" ");
        Some(if has_trailing_space { hint } else { format!(" {}", hint) })
    }
}

impl Hinter for MemkeepHinter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }
        self.get_hint(line)
    }
}

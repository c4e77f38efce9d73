//! Add command implementation.

use crate::memory::{NewEntry, parse_tags};
use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext, parse_args};

/// Command to save a new memory.
pub struct AddCommand;

impl Command for AddCommand {
    fn name(&self) -> &str {
        "add"
    }

    fn aliases(&self) -> &[&str] {
        &["a", "new", "save"]
    }

    fn description(&self) -> &str {
        "Save a new memory"
    }

    fn usage(&self) -> &str {
        "add [-e] [-t <tags>] <content>"
    }

    fn help(&self) -> &str {
        "Save a snippet, note or secret.\n\n\
         Options:\n  \
           -e, --encrypt     - Encrypt the content under a password\n  \
           -t, --tags <list> - Comma separated tags\n\n\
         Everything after the options is the content.\n\n\
         Examples:\n  \
           add -t git,cli git log --oneline --graph\n  \
           add -e -t aws AKIA..."
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let parsed = match parse_args(
            args,
            &["--encrypt"],
            &["--tags"],
            &[("-e", "--encrypt"), ("-t", "--tags")],
        ) {
            Ok(parsed) => parsed,
            Err(e) => return CommandResult::error(format!("{}\nUsage: {}", e, self.usage())),
        };

        let Some(content) = parsed.rest() else {
            return CommandResult::error(format!(
                "Usage: {}\nMissing content",
                self.usage()
            ));
        };

        let new = NewEntry {
            content,
            tags: parsed.option("--tags").map(parse_tags).unwrap_or_default(),
            encrypt: parsed.has("--encrypt"),
        };

        match ctx.memory.add(new, ctx.passwords) {
            Ok(entry) => {
                ctx.mark_modified();
                let kind = if entry.encrypted { "secret" } else { "memory" };
                CommandResult::success(format!("Saved {} #{}", kind, entry.id))
            }
            Err(e) => {
                log::warn!("Add failed: {}", e);
                CommandResult::error(e.to_string())
            }
        }
    }

    fn arg_kind(&self, previous: Option<&str>, _position: usize) -> ArgKind {
        match previous {
            Some("-t" | "--tags") => ArgKind::Tags,
            _ => ArgKind::Nothing,
        }
    }

    fn min_args(&self) -> usize {
        1
    }
}

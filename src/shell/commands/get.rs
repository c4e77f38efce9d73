//! Get command implementation.

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext, parse_id};

/// Command to show the full content of a memory.
pub struct GetCommand;

impl Command for GetCommand {
    fn name(&self) -> &str {
        "get"
    }

    fn aliases(&self) -> &[&str] {
        &["g", "show"]
    }

    fn description(&self) -> &str {
        "Show a memory, decrypting it if needed"
    }

    fn usage(&self) -> &str {
        "get <id>"
    }

    fn help(&self) -> &str {
        "Print the full content of a memory and count the use.\n\n\
         Encrypted memories ask for their password first.\n\n\
         Examples:\n  \
           get 104\n  \
           get #104"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let Some(arg) = args.first() else {
            return CommandResult::error(format!("Usage: {}\nMissing id", self.usage()));
        };
        let id = match parse_id(arg) {
            Ok(id) => id,
            Err(e) => return CommandResult::error(e),
        };

        match ctx.memory.get(id, ctx.passwords) {
            Ok(retrieved) => {
                // usage count changed
                ctx.mark_modified();
                CommandResult::success(retrieved.content)
            }
            Err(e) => CommandResult::error(e.to_string()),
        }
    }

    fn arg_kind(&self, _previous: Option<&str>, position: usize) -> ArgKind {
        if position == 0 { ArgKind::Id } else { ArgKind::Nothing }
    }

    fn min_args(&self) -> usize {
        1
    }
}

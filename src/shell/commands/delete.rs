//! Delete command implementation.

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext, parse_id};

/// Command to remove a memory and its secret.
pub struct DeleteCommand;

impl Command for DeleteCommand {
    fn name(&self) -> &str {
        "delete"
    }

    fn aliases(&self) -> &[&str] {
        &["rm", "del", "remove"]
    }

    fn description(&self) -> &str {
        "Delete a memory"
    }

    fn usage(&self) -> &str {
        "delete <id>"
    }

    fn help(&self) -> &str {
        "Delete a memory. Encrypted memories lose their secret as well.\n\n\
         Examples:\n  \
           delete 103\n  \
           rm 103"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let Some(arg) = args.first() else {
            return CommandResult::error(format!("Usage: {}\nMissing id", self.usage()));
        };
        let id = match parse_id(arg) {
            Ok(id) => id,
            Err(e) => return CommandResult::error(e),
        };

        match ctx.memory.delete(id) {
            Ok(entry) => {
                ctx.mark_modified();
                CommandResult::success(format!("Deleted #{}", entry.id))
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

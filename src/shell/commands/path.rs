//! Path command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};

/// Command to show where memories and secrets are stored.
pub struct PathCommand;

impl Command for PathCommand {
    fn name(&self) -> &str {
        "path"
    }

    fn aliases(&self) -> &[&str] {
        &["where"]
    }

    fn description(&self) -> &str {
        "Show where memories and secrets are stored"
    }

    fn usage(&self) -> &str {
        "path"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        match ctx.paths {
            Some(paths) => CommandResult::success(format!(
                "Memories: {}\nSecrets:  {}",
                paths.entries.display(),
                paths.vault.display()
            )),
            None => CommandResult::error("Storage location unknown"),
        }
    }
}

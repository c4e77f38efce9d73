//! Tags command implementation.

use crate::render;
use crate::shell::command::{Command, CommandResult, ShellContext};

/// Command to list tags by how often they are used.
pub struct TagsCommand;

impl Command for TagsCommand {
    fn name(&self) -> &str {
        "tags"
    }

    fn aliases(&self) -> &[&str] {
        &["t"]
    }

    fn description(&self) -> &str {
        "List tags, most used first"
    }

    fn usage(&self) -> &str {
        "tags"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let tags = ctx.memory.tags();
        log::debug!("Listing {} tags", tags.len());
        CommandResult::success(render::tag_table(&tags))
    }
}

//! Edit command implementation.

use crate::memory::{EntryEdit, parse_tags};
use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext, parse_args, parse_id};

/// Command to change the content or tags of a memory.
pub struct EditCommand;

impl Command for EditCommand {
    fn name(&self) -> &str {
        "edit"
    }

    fn aliases(&self) -> &[&str] {
        &["e", "update"]
    }

    fn description(&self) -> &str {
        "Change the content or tags of a memory"
    }

    fn usage(&self) -> &str {
        "edit <id> [-t <tags>] [content]"
    }

    fn help(&self) -> &str {
        "Replace the content and/or the tags of a memory.\n\n\
         Without content the current content is kept. Without -t the\n\
         current tags are kept; with -t the tag list is replaced.\n\
         Encrypted memories ask for their password and stay encrypted.\n\n\
         Examples:\n  \
           edit 102 docker compose up -d\n  \
           edit 102 -t docker,ops"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let parsed = match parse_args(args, &[], &["--tags"], &[("-t", "--tags")]) {
            Ok(parsed) => parsed,
            Err(e) => return CommandResult::error(format!("{}\nUsage: {}", e, self.usage())),
        };

        let Some((id_arg, content)) = parsed.positional.split_first() else {
            return CommandResult::error(format!("Usage: {}\nMissing id", self.usage()));
        };
        let id = match parse_id(id_arg) {
            Ok(id) => id,
            Err(e) => return CommandResult::error(e),
        };

        let edit = EntryEdit {
            content: (!content.is_empty()).then(|| content.join(" ")),
            tags: parsed.option("--tags").map(parse_tags),
        };
        if edit.content.is_none() && edit.tags.is_none() {
            return CommandResult::error(format!(
                "Nothing to change\nUsage: {}",
                self.usage()
            ));
        }

        match ctx.memory.edit(id, edit, ctx.passwords) {
            Ok(entry) => {
                ctx.mark_modified();
                CommandResult::success(format!("Updated #{}", entry.id))
            }
            Err(e) => CommandResult::error(e.to_string()),
        }
    }

    fn arg_kind(&self, previous: Option<&str>, position: usize) -> ArgKind {
        match previous {
            Some("-t" | "--tags") => ArgKind::Tags,
            _ if position == 0 => ArgKind::Id,
            _ => ArgKind::Nothing,
        }
    }

    fn min_args(&self) -> usize {
        2
    }
}

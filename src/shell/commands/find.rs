//! Find command implementation.

use crate::date::parse_date;
use crate::error::MemoryError;
use crate::render;
use crate::search::{MATCH_ALL, Query};
use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext, parse_args};

/// Command to search memories by pattern and day.
pub struct FindCommand;

impl Command for FindCommand {
    fn name(&self) -> &str {
        "find"
    }

    fn aliases(&self) -> &[&str] {
        &["f", "search", "ls", "list"]
    }

    fn description(&self) -> &str {
        "Search memories by pattern and date"
    }

    fn usage(&self) -> &str {
        "find [pattern] [-d <date>] [-n <limit>]"
    }

    fn help(&self) -> &str {
        "Search content and tags, case-insensitive.\n\n\
         '*' matches anything; other characters are regular expression\n\
         syntax, so '.' matches any single character.\n\n\
         Options:\n  \
           -d, --date <day>   - today, yesterday, YYYY-MM-DD or DD.MM.YYYY\n  \
           -n, --limit <num>  - Show at most this many results\n\n\
         Examples:\n  \
           find\n  \
           find rea*\n  \
           find docker -d yesterday"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let parsed = match parse_args(
            args,
            &[],
            &["--date", "--limit"],
            &[("-d", "--date"), ("-n", "--limit")],
        ) {
            Ok(parsed) => parsed,
            Err(e) => return CommandResult::error(format!("{}\nUsage: {}", e, self.usage())),
        };

        let mut query = Query::new(parsed.rest().unwrap_or_else(|| MATCH_ALL.to_string()));

        if let Some(term) = parsed.option("--date") {
            match parse_date(term) {
                Some(day) => query = query.on_day(day),
                None => {
                    return CommandResult::error(
                        MemoryError::InvalidDateTerm(term.to_string()).to_string(),
                    );
                }
            }
        }

        if let Some(limit) = parsed.option("--limit") {
            match limit.parse() {
                Ok(limit) => query = query.with_limit(limit),
                Err(_) => return CommandResult::error(format!("'{}' is not a number", limit)),
            }
        }

        match ctx.memory.find(&query) {
            Ok(found) => CommandResult::success(render::entry_table(&found)),
            Err(e) => CommandResult::error(e.to_string()),
        }
    }

    fn arg_kind(&self, previous: Option<&str>, position: usize) -> ArgKind {
        match previous {
            Some("-d" | "--date" | "-n" | "--limit") => ArgKind::Nothing,
            _ if position == 0 => ArgKind::Tags,
            _ => ArgKind::Nothing,
        }
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "memkeep")]
#[command(version)]
#[command(about = "Remembers snippets, commands and secrets for you", long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Save a new memory.
    #[command(alias = "a")]
    Add {
        /// Text to remember
        content: Option<String>,
        /// Comma separated tags
        #[arg(short, long)]
        tags: Option<String>,
        /// Encrypt the content under a password
        #[arg(short, long)]
        encrypt: bool,
        /// Read the content from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
        /// Take the content from the clipboard
        #[arg(long, conflicts_with_all = ["content", "stdin"])]
        clipboard: bool,
    },
    /// Search memories by content or tag.
    #[command(alias = "search")]
    Find {
        /// Wildcard pattern, '*' matches anything
        pattern: Option<String>,
        /// Only memories from this day (today, yesterday, YYYY-MM-DD, DD.MM.YYYY)
        #[arg(short, long)]
        date: Option<String>,
        /// Show at most this many results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a memory, decrypting it if needed.
    Get {
        id: u64,
    },
    /// Change the content or tags of a memory.
    Edit {
        id: u64,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
        /// Read the new content from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
        /// Take the new content from the clipboard
        #[arg(long, conflicts_with_all = ["content", "stdin"])]
        clipboard: bool,
        /// Replace the tags with this comma separated list
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// List tags by how often they are used.
    Tags,
    /// Delete a memory.
    #[command(alias = "rm")]
    Delete {
        id: u64,
    },
    /// Show where the data files live.
    Path,
    /// Start the interactive shell (default).
    Shell,
}

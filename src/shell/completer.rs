//! Tab completion for command names, memory ids and tags.

use rustyline::Context;
use rustyline::completion::{Completer, Pair};
use std::sync::{Arc, RwLock};

use crate::memory::Memory;
use crate::shell::command::{ArgKind, CommandRegistry};
use crate::trie::Trie;

/// Completion words drawn from the loaded memories.
#[derive(Debug, Default)]
pub struct Completions {
    pub ids: Trie,
    pub tags: Trie,
}

impl Completions {
    pub fn from_memory(memory: &Memory) -> Self {
        let mut completions = Self::default();
        completions.refresh(memory);
        completions
    }

    /// Rebuilds both tries from `memory`.
    pub fn refresh(&mut self, memory: &Memory) {
        self.ids.clear();
        self.tags.clear();
        for entry in memory.entries().iter() {
            self.ids.insert(&entry.id.to_string());
            for tag in &entry.tags {
                self.tags.insert(tag);
            }
        }
    }
}

pub struct MemkeepCompleter {
    registry: Arc<CommandRegistry>,
    completions: Arc<RwLock<Completions>>,
}

/// What the word under the cursor is.
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    Command {
        partial: &'a str,
    },
    Argument {
        command: &'a str,
        previous: Option<&'a str>,
        position: usize,
        partial: &'a str,
    },
}

impl MemkeepCompleter {
    pub fn new(registry: Arc<CommandRegistry>, completions: Arc<RwLock<Completions>>) -> Self {
        Self {
            registry,
            completions,
        }
    }

    fn target<'a>(&self, line: &'a str, pos: usize) -> Target<'a> {
        let line = &line[..pos];
        let words: Vec<&str> = line.split_whitespace().collect();
        let typing_new_word = line.is_empty() || line.ends_with(char::is_whitespace);

        let (done, partial) = if typing_new_word {
            (&words[..], "")
        } else {
            let (last, done) = words.split_last().map_or((&"", &[][..]), |(l, d)| (l, d));
            (done, *last)
        };

        let Some((&command, args)) = done.split_first() else {
            return Target::Command { partial };
        };

        // Positionals typed so far, skipping flags and their values.
        let mut position = 0;
        let mut skip_next = false;
        for arg in args {
            if skip_next {
                skip_next = false;
            } else if arg.starts_with('-') {
                skip_next = matches!(*arg, "-t" | "--tags" | "-d" | "--date" | "-n" | "--limit");
            } else {
                position += 1;
            }
        }

        Target::Argument {
            command,
            previous: args.last().copied(),
            position,
            partial,
        }
    }

    fn complete_words(&self, kind: ArgKind, partial: &str) -> (usize, Vec<String>) {
        match kind {
            ArgKind::Command => (0, self.registry.completions(partial)),
            ArgKind::Id => {
                let partial = partial.trim_start_matches('#');
                let words = self
                    .completions
                    .read()
                    .map(|c| c.ids.completions(partial))
                    .unwrap_or_default();
                (0, words)
            }
            ArgKind::Tags => {
                // Only the piece after the last comma is completed.
                let offset = partial.rfind(',').map_or(0, |i| i + 1);
                let piece = &partial[offset..];
                let words = self
                    .completions
                    .read()
                    .map(|c| c.tags.completions(piece))
                    .unwrap_or_default();
                (offset, words)
            }
            ArgKind::Nothing => (0, Vec::new()),
        }
    }
}

impl Completer for MemkeepCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (kind, partial) = match self.target(line, pos) {
            Target::Command { partial } => (ArgKind::Command, partial),
            Target::Argument {
                command,
                previous,
                position,
                partial,
            } => match self.registry.get(command) {
                Some(cmd) => (cmd.arg_kind(previous, position), partial),
                None => (ArgKind::Nothing, partial),
            },
        };

        let (offset, words) = self.complete_words(kind, partial);
        let start = pos - partial.len() + offset;
        let pairs = words
            .into_iter()
            .map(|w| Pair {
                display: w.clone(),
                replacement: w,
            })
            .collect();
        Ok((start, pairs))
    }
}

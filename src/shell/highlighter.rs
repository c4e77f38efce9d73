//! Input and output coloring for the shell.

use rustyline::highlight::{CmdKind, Highlighter};
use std::borrow::Cow;
use std::sync::Arc;

use crate::shell::command::{ArgKind, CommandRegistry};

/// ANSI escape codes.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, colors::RESET)
}

pub struct MemkeepHighlighter {
    registry: Arc<CommandRegistry>,
}

impl MemkeepHighlighter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    fn highlight_line(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() * 2);
        let mut rest = line;
        let mut command = None;
        let mut previous: Option<&str> = None;
        let mut position = 0;
        let mut encrypting = false;

        while !rest.is_empty() {
            let word_start = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            out.push_str(&rest[..word_start]);
            rest = &rest[word_start..];
            if rest.is_empty() {
                break;
            }
            let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let word = &rest[..word_end];
            rest = &rest[word_end..];

            let Some(cmd) = &command else {
                let found = self.registry.get(word);
                let color = if found.is_some() {
                    format!("{}{}", colors::BOLD, colors::CYAN)
                } else {
                    colors::RED.to_string()
                };
                out.push_str(&paint(&color, word));
                command = Some(found);
                continue;
            };

            let color = if word.starts_with('-') && word.len() > 1 {
                encrypting |= word == "-e" || word == "--encrypt";
                colors::BLUE
            } else {
                let kind = cmd
                    .as_ref()
                    .map_or(ArgKind::Nothing, |c| c.arg_kind(previous, position));
                position += 1;
                match kind {
                    ArgKind::Id => colors::MAGENTA,
                    ArgKind::Tags | ArgKind::Command => colors::YELLOW,
                    // secret content stays dim
                    ArgKind::Nothing if encrypting => colors::DIM,
                    ArgKind::Nothing => "",
                }
            };

            if color.is_empty() {
                out.push_str(word);
            } else {
                out.push_str(&paint(color, word));
            }
            previous = Some(word);
        }
        out
    }
}

impl Highlighter for MemkeepHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim().is_empty() {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(self.highlight_line(line))
        }
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!(
            "{}{}{}{}",
            colors::BOLD,
            colors::BRIGHT_GREEN,
            prompt,
            colors::RESET
        ))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(paint(colors::DIM, hint))
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        _completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        Cow::Owned(paint(colors::BRIGHT_CYAN, candidate))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

/// Colors for command output.
pub struct OutputHighlighter;

impl OutputHighlighter {
    pub fn success(msg: &str) -> String {
        paint(colors::GREEN, msg)
    }

    pub fn error(msg: &str) -> String {
        paint(colors::BRIGHT_RED, msg)
    }

    pub fn warning(msg: &str) -> String {
        paint(colors::YELLOW, msg)
    }
}

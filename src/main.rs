mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use cli::{Cli, Commands};
use memkeep::config::AppConfig;
use memkeep::date::parse_date;
use memkeep::error::MemoryError;
use memkeep::input::{ContentOrigin, TerminalPasswords, resolve_content};
use memkeep::logging::init_logging;
use memkeep::memory::{EntryEdit, Memory, NewEntry, parse_tags};
use memkeep::render;
use memkeep::search::{MATCH_ALL, Query};
use memkeep::shell::{Shell, ShellConfig};
use memkeep::storage::Storage;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if cli.verbose {
        config = config.raise_log_level(LevelFilter::Debug);
    }
    if let Err(e) = init_logging(&config.log_config()) {
        eprintln!("Warning: could not initialize logging: {:#}", e);
    }
    log::debug!("Using home {}", config.home().display());

    let storage = Storage::new(config.entries_path.clone(), config.vault_path.clone());
    let mut memory = storage.load()?;
    let mut passwords = TerminalPasswords;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Add {
            content,
            tags,
            encrypt,
            stdin,
            clipboard,
        } => {
            let new = NewEntry {
                content: read_content(content, ContentOrigin::from_flags(stdin, clipboard))?,
                tags: tags.as_deref().map(parse_tags).unwrap_or_default(),
                encrypt,
            };
            let entry = memory.add(new, &mut passwords)?;
            storage.save(&memory)?;
            println!("Saved #{}", entry.id);
        }
        Commands::Find {
            pattern,
            date,
            limit,
            json,
        } => {
            let query = build_query(pattern, date, limit)?;
            let found = memory.find(&query)?;
            if json {
                println!("{}", render::entries_json(&found)?);
            } else {
                println!("{}", render::entry_table(&found));
            }
        }
        Commands::Get { id } => {
            let retrieved = memory.get(id, &mut passwords)?;
            storage.save(&memory)?;
            println!("{}", retrieved.content);
        }
        Commands::Edit {
            id,
            content,
            stdin,
            clipboard,
            tags,
        } => {
            let content = if stdin || clipboard || content.is_some() {
                Some(read_content(content, ContentOrigin::from_flags(stdin, clipboard))?)
            } else {
                None
            };
            let edit = EntryEdit {
                content,
                tags: tags.as_deref().map(parse_tags),
            };
            if edit.content.is_none() && edit.tags.is_none() {
                bail!("Nothing to change, pass --content, --stdin, --clipboard or --tags");
            }
            let entry = memory.edit(id, edit, &mut passwords)?;
            storage.save(&memory)?;
            println!("Updated #{}", entry.id);
        }
        Commands::Tags => println!("{}", render::tag_table(&memory.tags())),
        Commands::Delete { id } => {
            memory.delete(id)?;
            storage.save(&memory)?;
            println!("Deleted #{}", id);
        }
        Commands::Path => {
            println!("Memories: {}", storage.paths().entries.display());
            println!("Secrets:  {}", storage.paths().vault.display());
        }
        Commands::Shell => run_shell(&config, &storage, &mut memory)?,
    }
    Ok(())
}

fn run_shell(config: &AppConfig, storage: &Storage, memory: &mut Memory) -> Result<()> {
    let shell = Shell::with_config(ShellConfig::default().with_history(config.history_path.clone()));
    shell.run_with_save(memory, &mut TerminalPasswords, storage.paths(), |m| {
        storage.save(m)?;
        Ok(())
    })
}

fn read_content(explicit: Option<String>, origin: ContentOrigin) -> Result<String> {
    let mut source = origin.source();
    Ok(resolve_content(explicit.as_deref(), source.as_mut())?)
}

fn build_query(pattern: Option<String>, date: Option<String>, limit: Option<usize>) -> Result<Query> {
    let mut query = Query::new(pattern.unwrap_or_else(|| MATCH_ALL.to_string()));
    if let Some(term) = date {
        let Some(day) = parse_date(&term) else {
            return Err(MemoryError::InvalidDateTerm(term).into());
        };
        query = query.on_day(day);
    }
    if let Some(limit) = limit {
        query = query.with_limit(limit);
    }
    Ok(query)
}

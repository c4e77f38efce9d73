//! Where memkeep keeps its files.

use anyhow::{Result, anyhow};
use log::LevelFilter;
use std::path::{Path, PathBuf};

use crate::logging::{self, LogConfig};

pub const HOME_ENV: &str = "MEMKEEP_HOME";
pub const LOG_ENV: &str = "MEMKEEP_LOG";

const DIR_NAME: &str = ".memkeep";
const ENTRIES_FILE: &str = "memories.json";
const VAULT_FILE: &str = "secrets.json";
const LOG_FILE: &str = "memkeep.log";
const HISTORY_FILE: &str = "history";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub home: PathBuf,
    pub entries_path: PathBuf,
    pub vault_path: PathBuf,
    pub log_path: PathBuf,
    pub history_path: PathBuf,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Resolves the configuration from the environment.
    ///
    /// `MEMKEEP_HOME` overrides the default `~/.memkeep` directory and
    /// `MEMKEEP_LOG` sets the log level.
    pub fn from_env() -> Result<Self> {
        let home = match std::env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs_next::home_dir()
                .map(|h| h.join(DIR_NAME))
                .ok_or_else(|| anyhow!("Could not determine home directory"))?,
        };

        let mut config = Self::for_home(home);
        if let Ok(level) = std::env::var(LOG_ENV) {
            match logging::parse_level(&level) {
                Some(level) => config.log_level = level,
                None => eprintln!("Ignoring unknown {} level '{}'", LOG_ENV, level),
            }
        }
        Ok(config)
    }

    pub fn for_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            entries_path: home.join(ENTRIES_FILE),
            vault_path: home.join(VAULT_FILE),
            log_path: home.join(LOG_FILE),
            history_path: home.join(HISTORY_FILE),
            log_level: LevelFilter::Info,
            home,
        }
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Makes logging at least as verbose as `level`.
    pub fn raise_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = self.log_level.max(level);
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::new(self.log_path.clone()).with_level(self.log_level)
    }
}

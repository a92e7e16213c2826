//! Runtime configuration: compiled-in defaults overridden by `DB_BOOTSTRAP_*`
//! environment variables (a `.env` file is loaded first by the binary).

use crate::bootstrap::DEFAULT_SCRIPT_LOCATIONS;
use crate::error::ConfigError;
use crate::populator::{PopulatorSettings, ScriptSettings};
use crate::populator::script::{
    DEFAULT_BLOCK_COMMENT_END, DEFAULT_BLOCK_COMMENT_START, DEFAULT_COMMENT_PREFIX,
    DEFAULT_STATEMENT_SEPARATOR,
};
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "DB_BOOTSTRAP_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub loglevel: String,
    pub max_connections: u32,
    /// Scripts to run, in order.
    pub script_locations: Vec<String>,
    /// Base directory for relative `file:` locations.
    pub resource_dir: PathBuf,
    pub continue_on_error: bool,
    pub ignore_failed_drops: bool,
    pub separator: String,
    pub comment_prefixes: Vec<String>,
    pub block_comment_start: String,
    pub block_comment_end: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:db-bootstrap.sqlite".to_string(),
            loglevel: "info".to_string(),
            max_connections: 5,
            script_locations: DEFAULT_SCRIPT_LOCATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            resource_dir: PathBuf::from("."),
            continue_on_error: false,
            ignore_failed_drops: false,
            separator: DEFAULT_STATEMENT_SEPARATOR.to_string(),
            comment_prefixes: vec![DEFAULT_COMMENT_PREFIX.to_string()],
            block_comment_start: DEFAULT_BLOCK_COMMENT_START.to_string(),
            block_comment_end: DEFAULT_BLOCK_COMMENT_END.to_string(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    pub fn populator_settings(&self) -> PopulatorSettings {
        PopulatorSettings {
            script: ScriptSettings {
                separator: self.separator.clone(),
                comment_prefixes: self.comment_prefixes.clone(),
                block_comment_start: self.block_comment_start.clone(),
                block_comment_end: self.block_comment_end.clone(),
            },
            continue_on_error: self.continue_on_error,
            ignore_failed_drops: self.ignore_failed_drops,
        }
    }
}

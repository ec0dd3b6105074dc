use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::ledger::DEFAULT_BLOCKS_LIMIT;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub blocks_dir: PathBuf,
    pub ledger_dir: PathBuf,
    pub blocks_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            blocks_dir: PathBuf::from("./data/blocks"),
            ledger_dir: PathBuf::from("./data"),
            blocks_limit: DEFAULT_BLOCKS_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            blocks_dir: lookup("BLOCKS_DIR").map_or(defaults.blocks_dir, PathBuf::from),
            ledger_dir: lookup("LEDGER_DIR").map_or(defaults.ledger_dir, PathBuf::from),
            blocks_limit: parsed(&lookup, "BLOCKS_LIMIT").unwrap_or(defaults.blocks_limit),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

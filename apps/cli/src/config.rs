//! Driver configuration from the environment.

use std::path::{Path, PathBuf};

use thiserror::Error;
use vocab_core::Settings;

pub const DEFAULT_DB: &str = "vtdb.~sv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("VOCAB_SEED must be an unsigned integer, got {0:?}")]
    InvalidSeed(String),

    #[error("cannot read settings file {path}: {source}")]
    SettingsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    SettingsFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration for a trainer session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Vocab file loaded at startup and offered when saving.
    pub db: PathBuf,
    pub settings: Settings,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db: PathBuf::from(DEFAULT_DB),
            settings: Settings::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Read `VOCAB_DB`, `VOCAB_SETTINGS` and `VOCAB_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = lookup("VOCAB_DB")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        let settings = match lookup("VOCAB_SETTINGS") {
            Some(path) if !path.trim().is_empty() => load_settings(Path::new(&path))?,
            _ => Settings::default(),
        };

        let seed = lookup("VOCAB_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed(raw))
            })
            .transpose()?;

        Ok(Self { db, settings, seed })
    }
}

/// Parse a JSON settings file. Missing keys keep their defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SettingsIo {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::SettingsFormat {
        path: path.display().to_string(),
        source,
    })
}

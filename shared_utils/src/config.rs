//! TOML-backed application configuration.
//!
//! One file configures both halves of the pipeline:
//! - `[cache]`: where fetched bar sequences are persisted and how long an
//!   entry stays fresh.
//! - `[profile]`: how many price bins a session profile uses and an optional
//!   time-of-day session window.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. The cache directory can be redirected per-host via
//! the `SVP_CACHE_DIR` environment variable, which takes precedence over the
//! file value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::env_override;

/// Environment variable that overrides `[cache].dir` when set.
pub const CACHE_DIR_ENV: &str = "SVP_CACHE_DIR";

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file was not valid TOML for the expected shape.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    /// Bar cache settings.
    pub cache: CacheConfig,
    /// Profile computation settings.
    pub profile: ProfileConfig,
}

/// Settings for the on-disk bar cache.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct CacheConfig {
    /// Directory holding one columnar file per cached fetch key.
    pub dir: PathBuf,
    /// Entry lifetime in seconds, measured from the stored-at timestamp.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cache"),
            ttl_secs: 3600,
        }
    }
}

impl CacheConfig {
    /// Effective cache directory: the `SVP_CACHE_DIR` environment override if
    /// set, otherwise the configured path.
    pub fn resolve_dir(&self) -> PathBuf {
        match env_override(CACHE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => self.dir.clone(),
        }
    }
}

/// Settings for session profile computation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ProfileConfig {
    /// Number of price bins per session profile.
    pub bins: usize,
    /// Optional time-of-day window restricting which bars enter a session.
    pub session: Option<SessionWindowConfig>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            bins: 30,
            session: None,
        }
    }
}

/// A time-of-day window, inclusive at both ends, as `HH:MM` wall-clock
/// strings in the bar series' native time zone.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SessionWindowConfig {
    /// Window start, e.g. `"08:00"`.
    pub start: String,
    /// Window end, e.g. `"17:30"`.
    pub end: String,
}

/// Parses an [`AppConfig`] from a TOML string, filling defaults for any
/// missing section or field.
pub fn load_config_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(toml_str)?)
}

/// Reads and parses a config file from disk.
///
/// See [`load_config_str`] for parsing semantics.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_str(&text)
}

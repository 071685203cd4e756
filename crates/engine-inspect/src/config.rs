//! TOML configuration for the inspector.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration:
//!
//! ```toml
//! precompute = true
//! replay = 100000
//! preview_bytes = 32
//! log_level = "debug"
//! ```
//!
//! Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Inspector settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InspectConfig {
    /// Compute and validate parameter offsets at decode time. Without it
    /// parameters cannot be displayed.
    #[serde(default = "default_true")]
    pub precompute: bool,
    /// Number of trusted replays to time after a successful decode. 0 skips
    /// the replay.
    #[serde(default)]
    pub replay: u32,
    /// Maximum number of payload bytes shown per parameter.
    #[serde(default = "default_preview_bytes")]
    pub preview_bytes: usize,
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            precompute: default_true(),
            replay: 0,
            preview_bytes: default_preview_bytes(),
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_preview_bytes() -> usize {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a field has
/// the wrong type.
pub fn parse_config(content: &str) -> Result<InspectConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration at `path`, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if a given file cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML.
pub fn load_config(path: Option<&Path>) -> Result<InspectConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(InspectConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

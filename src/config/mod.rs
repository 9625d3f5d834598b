//! Configuration file loading and parsing.
//!
//! This module handles loading the optional configuration file from disk and
//! parsing it into type-safe structures.
//!
//! # Configuration Sources
//!
//! Settings are merged in increasing order of precedence:
//!
//! 1. The configuration file, if one is present:
//!    - the path given on the command line, or
//!    - the default location:
//!      - **Linux/macOS:** `~/.linkding-mcp/config.json`
//!      - **Windows:** `%USERPROFILE%\.linkding-mcp\config.json`
//! 2. Environment variables (`LINKDING_URL`, `LINKDING_API_TOKEN`,
//!    `LINKDING_MCP_BIND`)
//! 3. Command-line flags (`--url`, `--token`, `--bind`)
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "linkding": { "url": "https://links.example.com", "api_token": "..." },
//!   "http": { "bind_address": "127.0.0.1:8080" },
//!   "logging": { "level": "warn" }
//! }
//! ```

mod settings;

pub use settings::{
    Config, HttpConfig, LinkdingConfig, LoggingConfig, Overrides, Settings, LOG_LEVELS,
};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.linkding-mcp/`
/// - **Windows:** `%USERPROFILE%\.linkding-mcp\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".linkding-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// An explicit `path` must exist. With `None`, the default location is used
/// if a file is there; otherwise an empty configuration is returned so that
/// everything can come from the environment or flags.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly named file cannot be found
/// - The file cannot be read
/// - The JSON is malformed or has unknown fields
/// - A value fails validation
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            })
        }
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    load_file(&config_path)
}

fn load_file(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

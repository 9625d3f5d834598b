//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Command-line flags and environment variables are layered on top with
//! [`Config::apply_overrides`] before the result is checked by
//! [`Config::resolve`].

use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::linkding::parse_base_url;

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Linkding connection settings.
    #[serde(default)]
    pub linkding: LinkdingConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values from the command line or environment that take precedence over
/// the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Linkding base URL.
    pub url: Option<String>,
    /// Linkding API token.
    pub api_token: Option<String>,
    /// HTTP listen address.
    pub bind_address: Option<String>,
}

/// Fully merged and validated settings.
#[derive(Clone)]
pub struct Settings {
    /// Linkding base URL.
    pub url: String,
    /// Linkding API token.
    pub api_token: String,
    /// HTTP listen address.
    pub bind_address: SocketAddr,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("api_token", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

impl Config {
    /// Replaces file values with any supplied overrides.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.linkding.url = Some(url);
        }
        if let Some(token) = overrides.api_token {
            self.linkding.api_token = Some(token);
        }
        if let Some(bind) = overrides.bind_address {
            self.http.bind_address = bind;
        }
    }

    /// Validates the values that can be checked from the file alone.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Checks the merged configuration and produces the settings to run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingValue`] if the Linkding URL or token is
    /// absent, and [`ConfigError::ValidationError`] if a value is malformed.
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        self.validate()?;

        let url = non_empty(self.linkding.url.as_deref()).ok_or(ConfigError::MissingValue {
            name: "Linkding URL (--url or LINKDING_URL)",
        })?;
        let api_token =
            non_empty(self.linkding.api_token.as_deref()).ok_or(ConfigError::MissingValue {
                name: "Linkding API token (--token or LINKDING_API_TOKEN)",
            })?;

        parse_base_url(url).map_err(|e| ConfigError::ValidationError {
            message: e.to_string(),
        })?;

        let bind_address = self.http.bind_address.parse().map_err(|e| {
            ConfigError::ValidationError {
                message: format!(
                    "Invalid bind address '{}': {e}",
                    self.http.bind_address
                ),
            }
        })?;

        Ok(Settings {
            url: url.to_string(),
            api_token: api_token.to_string(),
            bind_address,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Linkding connection settings.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkdingConfig {
    /// Base URL of the Linkding instance.
    #[serde(default)]
    pub url: Option<String>,

    /// REST API token.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl std::fmt::Debug for LinkdingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkdingConfig")
            .field("url", &self.url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Address the HTTP transport listens on.
    /// Default: "127.0.0.1:8080"
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Config {
        let mut config = Config::default();
        config.apply_overrides(Overrides {
            url: Some("https://links.example.com".to_string()),
            api_token: Some("secret-token".to_string()),
            bind_address: None,
        });
        config
    }

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.bind_address, "127.0.0.1:8080");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "linkding": {
                "url": "https://links.example.com",
                "api_token": "abc"
            },
            "http": {
                "bind_address": "0.0.0.0:9000"
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        let settings = config.resolve().unwrap();
        assert_eq!(settings.url, "https://links.example.com");
        assert_eq!(settings.api_token, "abc");
        assert_eq!(settings.bind_address.port(), 9000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config: Config = serde_json::from_str(
            r#"{"linkding": {"url": "http://file.test", "api_token": "file"}}"#,
        )
        .unwrap();
        config.apply_overrides(Overrides {
            url: Some("http://flag.test".to_string()),
            api_token: None,
            bind_address: Some("127.0.0.1:1234".to_string()),
        });

        let settings = config.resolve().unwrap();
        assert_eq!(settings.url, "http://flag.test");
        assert_eq!(settings.api_token, "file");
        assert_eq!(settings.bind_address.port(), 1234);
    }

    #[test]
    fn missing_url_and_token() {
        let err = Config::default().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { name } if name.contains("URL")));

        let mut config = Config::default();
        config.apply_overrides(Overrides {
            url: Some("https://links.example.com".to_string()),
            api_token: Some("   ".to_string()),
            bind_address: None,
        });
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { name } if name.contains("token")));
    }

    #[test]
    fn reject_relative_url() {
        let mut config = complete();
        config.linkding.url = Some("links.example.com".to_string());
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn reject_invalid_bind_address() {
        let mut config = complete();
        config.http.bind_address = "localhost".to_string();
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn reject_invalid_log_level() {
        let json = r#"{
            "logging": {
                "level": "loud"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = complete();
        assert!(!format!("{config:?}").contains("secret-token"));
        assert!(!format!("{:?}", config.resolve().unwrap()).contains("secret-token"));
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::EngineConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl EngineConfig {
    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `EngineConfig::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: PathBuf::from("<inline>"),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Timeouts are non-zero
    /// - The generated id prefix is non-empty and has no whitespace
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hooks.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "hooks.timeout_ms must be greater than zero".to_string(),
            });
        }

        if self.hooks.destroy_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "hooks.destroy_timeout_ms must be greater than zero".to_string(),
            });
        }

        let prefix = &self.naming.generated_prefix;
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "naming.generated_prefix '{}' must be non-empty and contain no whitespace",
                    prefix
                ),
            });
        }

        Ok(())
    }
}

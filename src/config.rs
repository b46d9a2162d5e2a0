//! Configuration Module
//!
//! This module defines the configuration structures for certdesk.
//! Configuration is loaded from TOML files and parsed using serde.

use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [api]
/// base_url = "http://localhost:5000"
/// timeout_ms = 10000
///
/// [intake]
/// allow_multiple = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

/// Certificate API connection settings
///
/// # Fields
/// - `base_url`: Root URL of the certificate API, without a trailing slash
/// - `timeout_ms`: Per-request timeout in milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Defaults for new student intake
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    /// Starting multiplicity mode for new builders
    #[serde(default = "default_allow_multiple")]
    pub allow_multiple: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            allow_multiple: default_allow_multiple(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_allow_multiple() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert!(config.intake.allow_multiple);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://certs.example.org"

            [intake]
            allow_multiple = false
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://certs.example.org");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert!(!config.intake.allow_multiple);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::parse("[api\nbase_url = 1").is_err());
    }
}

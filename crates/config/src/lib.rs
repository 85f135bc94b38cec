//! Configuration management for the retail assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (RETAIL_AGENT_ prefix, `__` separator)
//! - Runtime overrides

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, ExtractionConfig, FilterConfig, GeneratorConfig,
    HistoryConfig, ObservabilityConfig, RuntimeEnvironment, SearchConfig, Settings,
    ValidatorConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for retail_agent_core::Error {
    fn from(err: ConfigError) -> Self {
        retail_agent_core::Error::Config(err.to_string())
    }
}

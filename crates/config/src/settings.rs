//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{extraction, filter, generator, history, search, validator};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Typed catalog search
    #[serde(default)]
    pub search: SearchConfig,

    /// Constraint extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Textual catalog filtering and selection
    #[serde(default)]
    pub filter: FilterConfig,

    /// Reply post-validation
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Reply generator calls
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Conversation history
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Ranked products handed to the generator when no snapshot exists
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    search::MAX_RESULTS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// User turns scanned (newest first) when the current one lacks a budget
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// Smallest number accepted as a budget
    #[serde(default = "default_min_budget")]
    pub min_budget: u64,

    #[serde(default = "default_max_brands")]
    pub max_brands: usize,
}

fn default_history_turns() -> usize {
    extraction::HISTORY_TURNS
}

fn default_min_budget() -> u64 {
    extraction::MIN_BUDGET
}

fn default_max_brands() -> usize {
    extraction::MAX_BRANDS
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            history_turns: default_history_turns(),
            min_budget: default_min_budget(),
            max_brands: default_max_brands(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_representative_count")]
    pub representative_count: usize,

    #[serde(default = "default_alternatives_count")]
    pub alternatives_count: usize,

    #[serde(default = "default_top_count")]
    pub top_count: usize,
}

fn default_representative_count() -> usize {
    filter::REPRESENTATIVE_COUNT
}

fn default_alternatives_count() -> usize {
    filter::ALTERNATIVES_COUNT
}

fn default_top_count() -> usize {
    filter::TOP_COUNT
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            representative_count: default_representative_count(),
            alternatives_count: default_alternatives_count(),
            top_count: default_top_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// A quoted price is rewritten when it is off by more than both tolerances
    #[serde(default = "default_absolute_tolerance")]
    pub absolute_tolerance: f64,

    #[serde(default = "default_relative_tolerance")]
    pub relative_tolerance: f64,
}

fn default_absolute_tolerance() -> f64 {
    validator::ABSOLUTE_TOLERANCE
}

fn default_relative_tolerance() -> f64 {
    validator::RELATIVE_TOLERANCE
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: default_absolute_tolerance(),
            relative_tolerance: default_relative_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before the second attempt; doubles afterwards
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Sentinel reply signalling the generator's safety filter fired
    #[serde(default = "default_safety_block_reply")]
    pub safety_block_reply: String,
}

fn default_max_attempts() -> u32 {
    generator::MAX_ATTEMPTS
}

fn default_initial_backoff_ms() -> u64 {
    generator::INITIAL_BACKOFF_MS
}

fn default_safety_block_reply() -> String {
    generator::SAFETY_BLOCK_REPLY.to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            safety_block_reply: default_safety_block_reply(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_limit")]
    pub limit: usize,

    #[serde(default = "default_max_entries_per_user")]
    pub max_entries_per_user: usize,
}

fn default_history_limit() -> usize {
    history::LIMIT
}

fn default_max_entries_per_user() -> usize {
    history::MAX_ENTRIES_PER_USER
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
            max_entries_per_user: default_max_entries_per_user(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a YAML document and validate them
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML document and validate them
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_extraction()?;
        self.validate_validator()?;
        self.validate_generator()?;
        Ok(())
    }

    fn validate_extraction(&self) -> Result<(), ConfigError> {
        if self.extraction.history_turns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "extraction.history_turns".to_string(),
                message: "Must scan at least one turn".to_string(),
            });
        }

        if self.extraction.min_budget == 0 {
            return Err(ConfigError::InvalidValue {
                field: "extraction.min_budget".to_string(),
                message: "Budget floor must be positive".to_string(),
            });
        }

        Ok(())
    }

    fn validate_validator(&self) -> Result<(), ConfigError> {
        let v = &self.validator;

        if !(v.absolute_tolerance.is_finite() && v.absolute_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "validator.absolute_tolerance".to_string(),
                message: format!("Must be non-negative, got {}", v.absolute_tolerance),
            });
        }

        if !(0.0..=1.0).contains(&v.relative_tolerance) {
            return Err(ConfigError::InvalidValue {
                field: "validator.relative_tolerance".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", v.relative_tolerance),
            });
        }

        Ok(())
    }

    fn validate_generator(&self) -> Result<(), ConfigError> {
        if self.generator.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generator.max_attempts".to_string(),
                message: "At least one attempt is required".to_string(),
            });
        }

        if self.generator.safety_block_reply.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generator.safety_block_reply".to_string(),
                message: "Sentinel must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from `config/default`, `config/{env}` and the environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("RETAIL_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        dir = %dir.display(),
        "Settings loaded"
    );

    Ok(settings)
}

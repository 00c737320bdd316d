//! Configuration management for qlens analysis.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QLENS_ prefix)
//! 3. .env files
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EvalResult;
use crate::export::ExportConfig;
use crate::rules::{RuleSet, RuleSpec};

/// Rule file path.
pub const ENV_RULES_FILE: &str = "QLENS_RULES_FILE";
/// Include the dependency graph in reports (`true`/`false`).
pub const ENV_INCLUDE_GRAPH: &str = "QLENS_INCLUDE_GRAPH";
/// Pretty-print exported JSON (`true`/`false`).
pub const ENV_EXPORT_PRETTY: &str = "QLENS_EXPORT_PRETTY";
/// Log level filter.
pub const ENV_LOG_LEVEL: &str = "QLENS_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Inline rule definitions. When neither this nor `rules_file` is set,
    /// the default rules apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleSpec>>,

    /// YAML rule file. Relative paths in a config file resolve against the
    /// config file's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,

    /// Attach the dependency graph (nodes and edges) to analysis reports.
    pub include_graph: bool,

    /// Export settings.
    pub export: ExportConfig,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rules: None,
            rules_file: None,
            include_graph: false,
            export: ExportConfig::default(),
            log_level: "warn".into(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file without validating it.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::from_yaml(&contents)?;
        if let Some(dir) = path.parent() {
            config.rules_file = config
                .rules_file
                .map(|f| if f.is_relative() { dir.join(f) } else { f });
        }
        Ok(config)
    }

    /// Parse configuration from YAML text without validating it.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. Load .env file if it exists
    /// 2. Load from file if provided
    /// 3. Apply environment variable overrides
    ///
    /// Validation runs once, on the merged result.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// [`AnalysisConfig::load`] with an explicit variable lookup and no `.env`.
    pub fn load_with<F>(config_file: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match config_file {
            Some(path) => Self::read_file(path)?,
            None => Self::default(),
        };

        let config = config.merge_env_from(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Merge process environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge variables from `lookup` into this configuration.
    ///
    /// Only variables that are set override the current values. Boolean
    /// variables that do not parse are ignored.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_RULES_FILE) {
            self.rules_file = Some(PathBuf::from(v));
            self.rules = None;
        }
        if let Some(val) = lookup(ENV_INCLUDE_GRAPH).and_then(|v| parse_bool(&v)) {
            self.include_graph = val;
        }
        if let Some(val) = lookup(ENV_EXPORT_PRETTY).and_then(|v| parse_bool(&v)) {
            self.export.pretty = val;
        }
        if let Some(v) = lookup(ENV_LOG_LEVEL) {
            self.log_level = v.trim().to_ascii_lowercase();
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.log_level
            )));
        }

        if self.rules.is_some() && self.rules_file.is_some() {
            return Err(ConfigError::ValidationError(
                "set either 'rules' or 'rules_file', not both".to_string(),
            ));
        }

        if let Some(specs) = &self.rules {
            RuleSet::from_specs(specs.iter().cloned())
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }

        Ok(())
    }

    /// Resolve the configured rule set.
    pub fn rule_set(&self) -> EvalResult<RuleSet> {
        match (&self.rules_file, &self.rules) {
            (Some(path), _) => RuleSet::from_file(path),
            (None, Some(specs)) => RuleSet::from_specs(specs.iter().cloned()),
            (None, None) => RuleSet::defaults(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

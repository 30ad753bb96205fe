//! Parsing and validation for hookgrep.toml configuration files

use crate::error::ConfigError;
use crate::types::{GlobPattern, RuleId};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "hookgrep.toml";

/// Main configuration struct for hookgrep.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// hookgrep metadata
    pub hookgrep: HookgrepMeta,

    /// Per-rule enable/disable and settings
    #[serde(default)]
    pub rules: RulesConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Compiled set of the global exclude globs, None when there are none
    pub fn exclude_set(&self) -> Result<Option<GlobSet>, ConfigError> {
        if self.hookgrep.exclude.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.hookgrep.exclude {
            builder.add(compile_glob(pattern, "exclude")?);
        }
        builder
            .build()
            .map(Some)
            .map_err(|e| ConfigError::Validation(format!("Failed to build exclude set: {e}")))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hookgrep.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.hookgrep.version
            )));
        }

        for pattern in &self.hookgrep.exclude {
            compile_glob(pattern, "exclude")?;
        }

        for (rule_id, value) in &self.rules.0 {
            if let RuleValue::Settings(settings) = value {
                for pattern in &settings.exclude {
                    compile_glob(pattern, &format!("exclude for rule '{rule_id}'"))?;
                }
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hookgrep: HookgrepMeta {
                version: "1".to_string(),
                exclude: Vec::new(),
            },
            rules: RulesConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn compile_glob(pattern: &GlobPattern, what: &str) -> Result<Glob, ConfigError> {
    Glob::new(pattern.as_str()).map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid {what} glob pattern '{}': {e}",
            pattern.as_str()
        ))
    })
}

/// hookgrep metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookgrepMeta {
    /// Configuration version (must be "1")
    pub version: String,

    /// Files never checked by any rule
    #[serde(default)]
    pub exclude: Vec<GlobPattern>,
}

/// Rules configuration section: rule ID to value
///
/// Rules not mentioned here are enabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesConfig(HashMap<RuleId, RuleValue>);

impl RulesConfig {
    pub fn get(&self, id: &RuleId) -> Option<&RuleValue> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: RuleId, value: RuleValue) -> Option<RuleValue> {
        self.0.insert(id, value)
    }

    /// Returns false only for rules explicitly set to `false`
    pub fn is_enabled(&self, id: &RuleId) -> bool {
        !matches!(self.get(id), Some(RuleValue::Enabled(false)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A rule can be enabled with a boolean or configured with settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Simple boolean enable/disable
    Enabled(bool),
    /// Settings table for the rule; the rule stays enabled
    Settings(RuleSettings),
}

/// Settings for individual rules
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Extra paths this rule skips, on top of its own excludes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<GlobPattern>,
}

/// Output configuration section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

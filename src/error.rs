//! Error types for hookgrep
//!
//! Errors are grouped by concern: pattern compilation, rule construction and
//! registry access, and configuration. `HookgrepError` ties them together for
//! callers that drive whole checks.

use crate::types::RuleId;
use std::path::PathBuf;

/// Pattern compilation errors
///
/// Raised while turning pattern text into a matcher. Never raised at scan time.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// The regular expression failed to parse or compile
    #[error("invalid {part} '{pattern}': {source}")]
    Syntax {
        /// Which piece of the pattern source was rejected
        part: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The expression parsed but the anchored matcher for it could not be built
    #[error("failed to build matcher for {part} '{pattern}': {source}")]
    Engine {
        part: &'static str,
        pattern: String,
        #[source]
        source: regex_automata::meta::BuildError,
    },

    /// A per-line pattern requires a line break, which a single line never contains
    #[error("'{construct}' in '{pattern}' can never match inside a single line; use whole-file scope")]
    NewlineInLineScope {
        pattern: String,
        construct: String,
    },
}

/// Rule-related errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule's pattern could not be compiled for its scope
    #[error("Invalid pattern for rule '{id}': {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: PatternError,
    },

    /// A rule with the same identifier is already registered
    #[error("Duplicate rule ID: {0}")]
    DuplicateRule(RuleId),

    /// No rule with this identifier is registered
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Invalid rule definition (identifier, content type or glob)
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration syntax
    #[error("Invalid configuration syntax: {0}")]
    InvalidSyntax(#[from] toml::de::Error),

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for hookgrep
#[derive(Debug, thiserror::Error)]
pub enum HookgrepError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Source file could not be read
    #[error("Failed to read {file}: {source}")]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

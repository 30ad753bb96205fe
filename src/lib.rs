#![forbid(unsafe_code)]

//! Hookgrep: manifest-driven regex checks for text files
//!
//! Each rule pairs a regular expression with the content types it applies to
//! and a polarity: either any match is a violation, or the absence of a match
//! is. Rules are collected in a registry, evaluated independently per file,
//! and every evaluation yields a verdict with the positions of what it found.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, HookgrepError, PatternError, RuleError};

// Re-export core domain types for convenient access
pub use types::{ContentType, GlobPattern, Polarity, RuleId, Scope};

pub use engine::{Linter, MatchRecord, Outcome, Report, Verdict, evaluate};
pub use rules::{Rule, RuleDefinition, RuleRegistry};

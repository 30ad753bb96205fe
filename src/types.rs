#![forbid(unsafe_code)]

//! Core domain types for hookgrep
//!
//! This module defines the fundamental value types shared by rules, the
//! registry and the matcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain only alphanumeric characters, hyphens, and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(RuleId(id))
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value).ok_or_else(|| "Invalid rule ID".to_string())
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}

/// A content-type tag such as `python`, `rst` or `text`
///
/// Tags are lowercase ASCII words (letters, digits, `-`, `_`). The special tag
/// `any` is a wildcard in a rule's applicable-type list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentType(String);

impl ContentType {
    /// Wildcard tag matching every content type
    pub const ANY: &'static str = "any";
    /// Tag carried by every file that decodes as text
    pub const TEXT: &'static str = "text";

    /// Creates a new ContentType, normalizing to lowercase
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into().to_ascii_lowercase();
        if tag.is_empty() {
            return None;
        }
        if !tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(ContentType(tag))
    }

    /// The `any` wildcard
    pub fn any() -> Self {
        ContentType(Self::ANY.to_string())
    }

    /// The `text` tag
    pub fn text() -> Self {
        ContentType(Self::TEXT.to_string())
    }

    /// Returns true for the `any` wildcard
    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }

    /// Returns the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContentType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ContentType::new(value.clone()).ok_or_else(|| format!("Invalid content type: {value}"))
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.0
    }
}

/// Whether a rule flags the presence or the absence of its pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    /// Every match is a violation
    #[default]
    MatchIsViolation,
    /// The file violates the rule when the pattern never matches
    AbsenceIsViolation,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::MatchIsViolation => "match-is-violation",
            Polarity::AbsenceIsViolation => "absence-is-violation",
        }
    }
}

/// Whether a rule looks at one line at a time or at the whole file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    #[default]
    PerLine,
    WholeFile,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::PerLine => "per-line",
            Scope::WholeFile => "whole-file",
        }
    }
}

/// A glob pattern for file matching
///
/// This is a simple wrapper around a string that will be used with the `globset` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Creates a new GlobPattern
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    /// Returns the pattern as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GlobPattern {
    fn from(pattern: String) -> Self {
        GlobPattern(pattern)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        GlobPattern(pattern.to_string())
    }
}

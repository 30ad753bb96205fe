#![forbid(unsafe_code)]

//! Rule definitions and compiled rules

use crate::error::RuleError;
use crate::rules::pattern::{self, CompiledPattern, PatternSource};
use crate::types::{ContentType, GlobPattern, Polarity, RuleId, Scope};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Externally parsed description of a rule
///
/// Manifest parsing happens outside this crate; a parser only has to produce
/// these values (they deserialize from any serde format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub pattern: PatternSource,

    #[serde(default)]
    pub polarity: Polarity,

    /// Applicable content types; empty means any
    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub scope: Scope,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<GlobPattern>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<GlobPattern>,
}

impl RuleDefinition {
    /// Start a definition with the default polarity (match-is-violation),
    /// per-line scope and no type restriction
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            pattern: PatternSource::new(pattern),
            polarity: Polarity::default(),
            types: Vec::new(),
            scope: Scope::default(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_followed_by(mut self, exemption: impl Into<String>) -> Self {
        self.pattern.not_followed_by = Some(exemption.into());
        self
    }

    pub fn not_preceded_by(mut self, exemption: impl Into<String>) -> Self {
        self.pattern.not_preceded_by = Some(exemption.into());
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.pattern.ignore_case = true;
        self
    }

    pub fn include(mut self, glob: impl Into<GlobPattern>) -> Self {
        self.include.push(glob.into());
        self
    }

    pub fn exclude(mut self, glob: impl Into<GlobPattern>) -> Self {
        self.exclude.push(glob.into());
        self
    }
}

/// A compiled lint rule
///
/// Construction validates everything up front: a `Rule` that exists can always
/// be applied without failing.
pub struct Rule {
    id: RuleId,
    description: String,
    pattern: CompiledPattern,
    polarity: Polarity,
    types: Vec<ContentType>,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("pattern", &self.pattern)
            .field("polarity", &self.polarity)
            .field("types", &self.types)
            .field("include", &self.include.as_ref().map(|_| "<GlobSet>"))
            .field("exclude", &self.exclude.as_ref().map(|_| "<GlobSet>"))
            .finish()
    }
}

impl Rule {
    /// Compile a rule from its definition
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` for a bad identifier, content type
    /// or glob, and `RuleError::InvalidPattern` if the pattern does not compile
    /// for the rule's scope.
    pub fn from_definition(def: &RuleDefinition) -> Result<Self, RuleError> {
        let id = RuleId::new(def.id.clone())
            .ok_or_else(|| RuleError::InvalidDefinition(format!("Invalid rule ID: {:?}", def.id)))?;

        let types = def
            .types
            .iter()
            .map(|tag| {
                ContentType::new(tag.clone()).ok_or_else(|| {
                    RuleError::InvalidDefinition(format!(
                        "Invalid content type {tag:?} for rule '{id}'"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pattern =
            pattern::compile(&def.pattern, def.scope).map_err(|source| RuleError::InvalidPattern {
                id: id.as_str().to_string(),
                source,
            })?;

        let include = build_globset(&id, &def.include)?;
        let exclude = build_globset(&id, &def.exclude)?;

        Ok(Rule {
            id,
            description: def.description.clone(),
            pattern,
            polarity: def.polarity,
            types,
            include,
            exclude,
        })
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn scope(&self) -> Scope {
        self.pattern.scope()
    }

    /// Applicable content types; empty means any
    pub fn types(&self) -> &[ContentType] {
        &self.types
    }

    /// Returns true if this rule applies to files tagged with `content_type`
    pub fn applies_to(&self, content_type: &ContentType) -> bool {
        self.types.is_empty()
            || content_type.is_any()
            || self
                .types
                .iter()
                .any(|t| t.is_any() || t == content_type)
    }

    /// Check the rule's include/exclude globs against a file path
    pub fn applies_to_path(&self, file_path: &Path) -> bool {
        if let Some(ref exclude) = self.exclude
            && exclude.is_match(file_path)
        {
            return false;
        }

        match self.include {
            Some(ref include) => include.is_match(file_path),
            None => true,
        }
    }
}

/// Build a GlobSet from a list of glob patterns, None when the list is empty
fn build_globset(id: &RuleId, patterns: &[GlobPattern]) -> Result<Option<GlobSet>, RuleError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_str()).map_err(|e| {
            RuleError::InvalidDefinition(format!(
                "Invalid glob pattern '{}' for rule '{}': {}",
                pattern.as_str(),
                id,
                e
            ))
        })?;
        builder.add(glob);
    }

    builder.build().map(Some).map_err(|e| {
        RuleError::InvalidDefinition(format!("Failed to build GlobSet for rule '{id}': {e}"))
    })
}

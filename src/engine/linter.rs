#![forbid(unsafe_code)]

//! Parallel evaluation of registered rules
//!
//! The Linter owns a shared, read-only registry. Each (rule, file) evaluation
//! is independent, so files and the rules within a file are both spread over
//! rayon's thread pool. Results are put back in a fixed order afterwards:
//! by file path, then by rule registration order.
//!
//! Path globs (global excludes and per-rule include/exclude) are matched
//! against paths relative to the Linter's root, with any leading `./` removed.

use crate::config::Config;
use crate::engine::classify::{ContentClassifier, ExtensionClassifier};
use crate::engine::source::{SourceFile, read_source};
use crate::engine::verdict::{Report, Verdict, evaluate};
use crate::error::ConfigError;
use crate::rules::{Rule, RuleRegistry};
use crate::types::ContentType;
use globset::GlobSet;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Evaluates every applicable rule against files
pub struct Linter {
    registry: Arc<RuleRegistry>,
    classifier: Arc<dyn ContentClassifier>,
    exclude: Option<GlobSet>,
    root: Option<PathBuf>,
}

impl Linter {
    /// Creates a Linter using extension-based classification
    pub fn new(registry: RuleRegistry) -> Self {
        Self::with_classifier(registry, ExtensionClassifier::new())
    }

    /// Creates a Linter with a custom content classifier
    pub fn with_classifier(
        registry: RuleRegistry,
        classifier: impl ContentClassifier + 'static,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            classifier: Arc::new(classifier),
            exclude: None,
            root: None,
        }
    }

    /// Creates a Linter honoring the global excludes of `config`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if an exclude glob does not compile.
    pub fn with_config(registry: RuleRegistry, config: &Config) -> Result<Self, ConfigError> {
        let mut linter = Self::new(registry);
        linter.exclude = config.exclude_set()?;
        Ok(linter)
    }

    /// Match path globs relative to `root`
    ///
    /// Paths outside `root` are matched as given.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The registry this Linter evaluates
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluate every rule applicable to `content_type` and `file_path`
    ///
    /// Verdicts come back in registration order, clean ones included.
    pub fn evaluate_all(
        &self,
        content_type: &ContentType,
        file_path: &Path,
        content: &str,
    ) -> Vec<Verdict> {
        let rules: Vec<&Rule> = self
            .registry
            .rules_for(content_type)
            .filter(|rule| rule.applies_to_path(self.glob_path(file_path)))
            .collect();
        evaluate_rules(&rules, file_path, content)
    }

    /// Evaluate every rule applicable to any of `tags` and `file_path`
    pub fn evaluate_tags(
        &self,
        tags: &[ContentType],
        file_path: &Path,
        content: &str,
    ) -> Vec<Verdict> {
        let rules: Vec<&Rule> = self
            .registry
            .rules_for_file(tags, self.glob_path(file_path))
            .collect();
        evaluate_rules(&rules, file_path, content)
    }

    /// Classify a loaded file and evaluate the rules that apply to it
    pub fn check_source(&self, file: &SourceFile) -> Vec<Verdict> {
        let mut tags = self.classifier.classify(&file.path);
        if !file.is_text {
            tags.retain(|tag| tag.as_str() != ContentType::TEXT);
        }

        tracing::debug!(file = %file.path.display(), tags = ?tags, "checking file");
        self.evaluate_tags(&tags, &file.path, &file.content)
    }

    /// Read, classify and check files in parallel
    ///
    /// Files matching the configured excludes are skipped. Unreadable files are
    /// logged and skipped; they do not count as checked.
    pub fn check_paths(&self, paths: &[PathBuf]) -> Report {
        let per_file: Vec<Option<Vec<Verdict>>> = paths
            .par_iter()
            .map(|path| {
                if self.is_excluded(path) {
                    tracing::debug!(file = %path.display(), "excluded by configuration");
                    return None;
                }

                match read_source(path) {
                    Ok(file) => Some(self.check_source(&file)),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping unreadable file");
                        None
                    }
                }
            })
            .collect();

        let files_checked = per_file.iter().filter(|v| v.is_some()).count();
        let mut verdicts: Vec<Verdict> = per_file.into_iter().flatten().flatten().collect();
        // stable: keeps registration order within a file
        verdicts.sort_by(|a, b| a.file.cmp(&b.file));

        let rules_executed = verdicts
            .iter()
            .map(|v| &v.rule_id)
            .collect::<HashSet<_>>()
            .len();

        Report {
            verdicts,
            files_checked,
            rules_executed,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|set| set.is_match(self.glob_path(path)))
    }

    /// The form of `path` that globs are matched against
    fn glob_path<'p>(&self, path: &'p Path) -> &'p Path {
        let relative = self
            .root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        relative.strip_prefix(".").unwrap_or(relative)
    }
}

fn evaluate_rules(rules: &[&Rule], file_path: &Path, content: &str) -> Vec<Verdict> {
    rules
        .par_iter()
        .map(|rule| evaluate(rule, file_path, content))
        .collect()
}

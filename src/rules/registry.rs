#![forbid(unsafe_code)]

//! Rule registry
//!
//! The RuleRegistry owns every compiled rule for the life of the process.
//! Rules are kept in registration order so that iteration, and therefore every
//! report built from it, is reproducible. Nothing is ever removed: rules that
//! configuration disables are simply never registered.

use crate::config::{RuleValue, RulesConfig};
use crate::error::RuleError;
use crate::rules::builtin;
use crate::rules::{Rule, RuleDefinition};
use crate::types::{ContentType, RuleId};
use std::collections::HashMap;
use std::path::Path;

/// Registry of compiled rules keyed by their unique RuleId
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    index: HashMap<RuleId, usize>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in hook catalog
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let rejected = registry.load(builtin::definitions());
        debug_assert!(rejected.is_empty(), "built-in rules must compile: {rejected:?}");
        registry
    }

    /// Build a registry, failing on the first definition that does not register
    ///
    /// # Errors
    ///
    /// Returns the first `RuleError` encountered.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = RuleDefinition>,
    {
        let mut registry = Self::new();
        for def in definitions {
            registry.register(Rule::from_definition(&def)?)?;
        }
        Ok(registry)
    }

    /// Compile and register every definition
    ///
    /// A definition that fails (invalid pattern, duplicate ID, bad type or glob)
    /// is skipped and its error returned; the others still register.
    pub fn load<I>(&mut self, definitions: I) -> Vec<RuleError>
    where
        I: IntoIterator<Item = RuleDefinition>,
    {
        let mut rejected = Vec::new();

        for def in definitions {
            let result = Rule::from_definition(&def).and_then(|rule| self.register(rule));
            if let Err(e) = result {
                tracing::warn!(rule = %def.id, error = %e, "rejected rule definition");
                rejected.push(e);
            }
        }

        rejected
    }

    /// Like [`load`](Self::load), applying per-rule configuration first
    ///
    /// Rules disabled in `config` are skipped; settings tables add their
    /// excludes to the rule's own.
    pub fn load_with_config<I>(&mut self, definitions: I, config: &RulesConfig) -> Vec<RuleError>
    where
        I: IntoIterator<Item = RuleDefinition>,
    {
        let configured = definitions.into_iter().filter_map(|mut def| {
            let value = RuleId::new(def.id.clone()).and_then(|id| config.get(&id));
            match value {
                Some(RuleValue::Enabled(false)) => {
                    tracing::debug!(rule = %def.id, "rule disabled by configuration");
                    None
                }
                Some(RuleValue::Settings(settings)) => {
                    def.exclude.extend(settings.exclude.iter().cloned());
                    Some(def)
                }
                Some(RuleValue::Enabled(true)) | None => Some(def),
            }
        });

        self.load(configured)
    }

    /// Register a compiled rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError::DuplicateRule` if a rule with the same ID exists.
    pub fn register(&mut self, rule: Rule) -> Result<(), RuleError> {
        if self.index.contains_key(rule.id()) {
            return Err(RuleError::DuplicateRule(rule.id().clone()));
        }

        tracing::debug!(
            rule = %rule.id(),
            scope = rule.scope().as_str(),
            polarity = rule.polarity().as_str(),
            "registered rule"
        );
        self.index.insert(rule.id().clone(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Get a rule by its ID
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownRule` if no rule has this ID.
    pub fn lookup(&self, id: &str) -> Result<&Rule, RuleError> {
        RuleId::new(id)
            .and_then(|id| self.get(&id))
            .ok_or_else(|| RuleError::UnknownRule(id.to_string()))
    }

    /// Get a rule by its ID, `None` if absent
    pub fn get(&self, id: &RuleId) -> Option<&Rule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    /// Rules applicable to a content type, in registration order
    pub fn rules_for<'a>(
        &'a self,
        content_type: &'a ContentType,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.applies_to(content_type))
    }

    /// Rules applicable to any of the given tags, in registration order
    pub fn rules_for_tags<'a>(
        &'a self,
        tags: &'a [ContentType],
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| tags.iter().any(|tag| rule.applies_to(tag)))
    }

    /// Rules applicable to a file with the given tags and path
    pub fn rules_for_file<'a>(
        &'a self,
        tags: &'a [ContentType],
        path: &'a Path,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules_for_tags(tags)
            .filter(move |rule| rule.applies_to_path(path))
    }

    /// Iterate over all rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Get the number of rules in the registry
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSettings;
    use crate::types::GlobPattern;

    fn def(id: &str, types: &[&str]) -> RuleDefinition {
        RuleDefinition::new(id, "TODO").types(types.iter().copied())
    }

    fn ids<'a>(rules: impl Iterator<Item = &'a Rule>) -> Vec<&'a str> {
        rules.map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn test_new_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule::from_definition(&def("rule-1", &[])).unwrap())
            .unwrap();

        let id = RuleId::new("rule-1").unwrap();
        assert_eq!(registry.get(&id).unwrap().id(), &id);
        assert_eq!(registry.lookup("rule-1").unwrap().id(), &id);
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule::from_definition(&def("dup", &[])).unwrap())
            .unwrap();

        let err = registry
            .register(Rule::from_definition(&def("dup", &["python"])).unwrap())
            .unwrap_err();
        assert!(matches!(err, RuleError::DuplicateRule(ref id) if id.as_str() == "dup"));
        assert_eq!(registry.len(), 1);
        // first registration wins
        assert!(registry.lookup("dup").unwrap().types().is_empty());
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = RuleRegistry::new();
        assert!(matches!(
            registry.lookup("nonexistent"),
            Err(RuleError::UnknownRule(_))
        ));
        // not even a valid ID
        assert!(matches!(
            registry.lookup("not valid!"),
            Err(RuleError::UnknownRule(_))
        ));
    }

    #[test]
    fn test_load_skips_failures_and_keeps_others() {
        let mut registry = RuleRegistry::new();
        let rejected = registry.load(vec![
            def("good-1", &[]),
            RuleDefinition::new("bad-pattern", "(unclosed"),
            def("good-1", &[]),
            def("good-2", &[]),
        ]);

        assert_eq!(rejected.len(), 2);
        assert!(matches!(rejected[0], RuleError::InvalidPattern { .. }));
        assert!(matches!(rejected[1], RuleError::DuplicateRule(_)));
        assert_eq!(ids(registry.iter()), vec!["good-1", "good-2"]);
    }

    #[test]
    fn test_from_definitions_strict() {
        let ok = RuleRegistry::from_definitions(vec![def("a", &[]), def("b", &[])]).unwrap();
        assert_eq!(ok.len(), 2);

        let err = RuleRegistry::from_definitions(vec![def("a", &[]), def("a", &[])]).unwrap_err();
        assert!(err.to_string().contains("Duplicate rule ID"));
    }

    #[test]
    fn test_rules_for_registration_order() {
        let registry = RuleRegistry::from_definitions(vec![
            def("z-python", &["python"]),
            def("a-rst", &["rst"]),
            def("m-any", &["any"]),
            def("b-untyped", &[]),
            def("c-python-rst", &["python", "rst"]),
        ])
        .unwrap();

        let python = ContentType::new("python").unwrap();
        assert_eq!(
            ids(registry.rules_for(&python)),
            vec!["z-python", "m-any", "b-untyped", "c-python-rst"]
        );

        let rst = ContentType::new("rst").unwrap();
        assert_eq!(
            ids(registry.rules_for(&rst)),
            vec!["a-rst", "m-any", "b-untyped", "c-python-rst"]
        );

        let typescript = ContentType::new("typescript").unwrap();
        assert_eq!(ids(registry.rules_for(&typescript)), vec!["m-any", "b-untyped"]);
    }

    #[test]
    fn test_rules_for_tags_no_duplicates() {
        let registry = RuleRegistry::from_definitions(vec![
            def("py", &["python"]),
            def("txt", &["text"]),
            def("both", &["python", "text"]),
            def("rst", &["rst"]),
        ])
        .unwrap();

        let tags = vec![ContentType::new("python").unwrap(), ContentType::text()];
        assert_eq!(ids(registry.rules_for_tags(&tags)), vec!["py", "txt", "both"]);
    }

    #[test]
    fn test_rules_for_file_respects_globs() {
        let registry = RuleRegistry::from_definitions(vec![
            def("everywhere", &[]),
            def("not-tests", &[]).exclude("tests/**"),
        ])
        .unwrap();

        let tags = vec![ContentType::text()];
        assert_eq!(
            ids(registry.rules_for_file(&tags, Path::new("tests/a.py"))),
            vec!["everywhere"]
        );
        assert_eq!(
            ids(registry.rules_for_file(&tags, Path::new("src/a.py"))),
            vec!["everywhere", "not-tests"]
        );
    }

    #[test]
    fn test_load_with_config() {
        let mut config = RulesConfig::default();
        config.insert(RuleId::new("off").unwrap(), RuleValue::Enabled(false));
        config.insert(RuleId::new("on").unwrap(), RuleValue::Enabled(true));
        config.insert(
            RuleId::new("narrowed").unwrap(),
            RuleValue::Settings(RuleSettings {
                exclude: vec![GlobPattern::new("legacy/**")],
            }),
        );

        let mut registry = RuleRegistry::new();
        let rejected = registry.load_with_config(
            vec![def("off", &[]), def("on", &[]), def("narrowed", &[]), def("default", &[])],
            &config,
        );

        assert!(rejected.is_empty());
        assert_eq!(ids(registry.iter()), vec!["on", "narrowed", "default"]);

        let narrowed = registry.lookup("narrowed").unwrap();
        assert!(!narrowed.applies_to_path(Path::new("legacy/old.py")));
        assert!(narrowed.applies_to_path(Path::new("src/new.py")));
    }

    #[test]
    fn test_builtin_registry_loads_every_definition() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.len(), builtin::definitions().len());
        assert!(registry.lookup("python-no-eval").is_ok());
    }
}

#![forbid(unsafe_code)]

//! Built-in rules
//!
//! The standard grep hooks for Python and reStructuredText sources, plus one
//! for any text file. Each rule spells out its own exemptions through
//! `not_followed_by`/`not_preceded_by`.

use crate::rules::RuleDefinition;
use crate::types::Scope;

/// Definitions of every built-in rule, in catalog order
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::new("python-check-blanket-noqa", r"#\s*noqa")
            .description("Enforce that `noqa` annotations always occur with specific codes")
            .not_followed_by(r":\s?[A-Z]+[0-9]+")
            .ignore_case()
            .types(["python"]),
        RuleDefinition::new("python-check-blanket-type-ignore", r"#\s*type:?\s*ignore")
            .description("Enforce that `# type: ignore` annotations always occur with specific codes")
            .not_followed_by(r"[\[\w]")
            .types(["python"]),
        RuleDefinition::new(
            "python-check-mock-methods",
            r"\.(?:called_once_with|called_once|not_called|has_calls|any_call)\(",
        )
        .description("Prevent common mistakes of `assert mck.not_called()` and `mck.called_once_with(...)`")
        .types(["python"]),
        RuleDefinition::new("python-no-eval", r"\beval\(")
            .description("A quick check for the `eval()` built-in function")
            .types(["python"]),
        RuleDefinition::new("python-no-log-warn", r"\.warn\(")
            .description("A quick check for the deprecated `.warn()` method of python loggers")
            .not_preceded_by(r"\bwarnings")
            .types(["python"]),
        RuleDefinition::new("python-use-type-annotations", r"# type\b")
            .description("Enforce that python3.6+ type annotations are used instead of type comments")
            .not_followed_by(r": *ignore\b")
            .types(["python"]),
        RuleDefinition::new(
            "rst-backticks",
            r"^(?:(?: {0,3}[^ ].*| {0,2}) )?`[^`]+`(?:[^_]|$)",
        )
        .description("Detect common mistake of using single backticks when writing rst")
        .types(["rst"]),
        RuleDefinition::new("rst-directive-colons", r"^\s*\.\. [a-z]+(?: | :)?:$")
            .description("Detect mistake of rst directive not ending with double colon or space before the double colon")
            .types(["rst"]),
        RuleDefinition::new("rst-inline-touching-normal", r"\w``\w")
            .description("Detect mistake of inline code touching normal text in rst")
            .scope(Scope::WholeFile)
            .types(["rst"]),
        RuleDefinition::new("text-unicode-replacement-char", r"\x{FFFD}")
            .description("Forbid files which have a UTF-8 Unicode replacement character")
            .types(["text"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_definitions_compile() {
        for def in definitions() {
            Rule::from_definition(&def)
                .unwrap_or_else(|e| panic!("built-in rule {} failed: {}", def.id, e));
        }
    }

    #[test]
    fn test_builtin_ids_unique() {
        let defs = definitions();
        let ids: HashSet<_> = defs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), defs.len());
    }

    #[test]
    fn test_builtin_descriptions_present() {
        for def in definitions() {
            assert!(!def.description.is_empty(), "{} has no description", def.id);
            assert!(!def.types.is_empty(), "{} has no types", def.id);
        }
    }
}

//! Property tests for rule evaluation

use hookgrep::engine::evaluate;
use hookgrep::rules::{Rule, RuleDefinition};
use hookgrep::types::{Polarity, Scope};
use proptest::prelude::*;
use std::path::Path;

fn todo_rule(polarity: Polarity, scope: Scope) -> Rule {
    Rule::from_definition(&RuleDefinition::new("no-todo", "TODO").polarity(polarity).scope(scope))
        .unwrap()
}

fn scope() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::PerLine), Just(Scope::WholeFile)]
}

proptest! {
    #[test]
    fn clean_when_pattern_absent(content in "[a-z \n]{0,200}", scope in scope()) {
        // lowercase-only content can never contain "TODO"
        let rule = todo_rule(Polarity::MatchIsViolation, scope);
        let verdict = evaluate(&rule, Path::new("a.txt"), &content);
        prop_assert!(verdict.is_clean());
        prop_assert!(verdict.matches.is_empty());
    }

    #[test]
    fn absence_violated_iff_no_occurrence(content in "(TODO|[a-zA-Z \n]){0,60}", scope in scope()) {
        let rule = todo_rule(Polarity::AbsenceIsViolation, scope);
        let verdict = evaluate(&rule, Path::new("a.txt"), &content);
        prop_assert_eq!(verdict.is_violated(), !content.contains("TODO"));
    }

    #[test]
    fn evaluate_is_idempotent(content in "(TODO|.|\n){0,100}", scope in scope()) {
        let rule = todo_rule(Polarity::MatchIsViolation, scope);
        let first = evaluate(&rule, Path::new("a.txt"), &content);
        let second = evaluate(&rule, Path::new("a.txt"), &content);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn per_line_never_reports_line_zero(content in "(TODO|[a-z \r\n]){0,100}") {
        let rule = todo_rule(Polarity::MatchIsViolation, Scope::PerLine);
        let verdict = evaluate(&rule, Path::new("a.txt"), &content);
        for record in &verdict.matches {
            prop_assert!(record.line >= 1);
            prop_assert!(record.column >= 1);
            prop_assert_eq!(&content[record.offset..record.offset + 4], "TODO");
        }
        prop_assert_eq!(verdict.matches.len(), content.matches("TODO").count());
    }

    #[test]
    fn absence_sentinel_is_line_zero(content in "[a-z \n]{0,100}", scope in scope()) {
        let rule = todo_rule(Polarity::AbsenceIsViolation, scope);
        let verdict = evaluate(&rule, Path::new("a.txt"), &content);
        prop_assert_eq!(verdict.matches.len(), 1);
        prop_assert_eq!(verdict.matches[0].line, 0);
        prop_assert!(verdict.matches[0].is_absence());
    }
}

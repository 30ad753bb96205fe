#![forbid(unsafe_code)]

//! Integration tests for rule evaluation and verdict aggregation

mod common;

use common::TestResult;
use hookgrep::engine::{Outcome, Report, ScanContext, apply, evaluate};
use hookgrep::rules::{Rule, RuleDefinition};
use hookgrep::types::{Polarity, Scope};
use std::path::Path;

fn rule(def: RuleDefinition) -> Rule {
    assert_ok!(Rule::from_definition(&def))
}

#[test]
fn test_banned_call() {
    let banned = rule(RuleDefinition::new("banned-call", r"\beval\("));

    let verdict = evaluate(&banned, Path::new("a.py"), r#"eval("3 + 4")"#);
    assert_eq!(verdict.outcome, Outcome::Violated);
    assert_eq!(verdict.matches.len(), 1);
    assert_eq!(verdict.matches[0].offset, 0);
    assert_eq!(verdict.matches[0].line, 1);
    assert_eq!(verdict.matches[0].column, 1);
    assert_eq!(verdict.matches[0].snippet, "eval(");

    let verdict = evaluate(&banned, Path::new("a.py"), r#"literal_eval("{1: 2}")"#);
    assert_eq!(verdict.outcome, Outcome::Clean);
    assert!(verdict.matches.is_empty());
}

#[test]
fn test_blanket_suppress() {
    let blanket = rule(
        RuleDefinition::new("blanket-suppress", r"#\s*noqa")
            .not_followed_by(r":\s?[A-Z]+[0-9]+"),
    );

    assert!(evaluate(&blanket, Path::new("a.py"), "# noqa").is_violated());
    assert!(evaluate(&blanket, Path::new("a.py"), "# noqa: F401").is_clean());
}

#[test]
fn test_paired_markup() {
    let paired = rule(RuleDefinition::new("paired-markup", r"\w``\w").scope(Scope::WholeFile));

    assert!(evaluate(&paired, Path::new("a.rst"), "``code``normal").is_violated());
    assert!(evaluate(&paired, Path::new("a.rst"), "``code`` normal").is_clean());
}

#[test]
fn test_independent_rules() {
    let a = rule(RuleDefinition::new("rule-a", "TODO"));
    let b = rule(RuleDefinition::new("rule-b", "FIXME"));
    let path = Path::new("notes.txt");
    let content = "TODO: write this\n";

    let report = Report::from_verdicts(vec![evaluate(&a, path, content), evaluate(&b, path, content)]);

    assert_eq!(report.verdicts.len(), 2);
    assert_eq!(report.violation_count(), 1);
    let violated: Vec<&str> = report.violated_rules().into_iter().map(|id| id.as_str()).collect();
    assert_eq!(violated, vec!["rule-a"]);
    assert!(report.verdicts[1].is_clean());
}

#[test]
fn test_absence_rule() {
    let license = rule(
        RuleDefinition::new("needs-license", "SPDX-License-Identifier")
            .polarity(Polarity::AbsenceIsViolation),
    );

    let verdict = evaluate(&license, Path::new("a.py"), "import os\n");
    assert!(verdict.is_violated());
    assert_eq!(verdict.matches.len(), 1);
    assert!(verdict.matches[0].is_absence());
    assert_eq!(verdict.matches[0].line, 0);
    assert_eq!(verdict.matches[0].snippet, "");

    let verdict = evaluate(
        &license,
        Path::new("a.py"),
        "# SPDX-License-Identifier: MIT\nimport os\n",
    );
    assert!(verdict.is_clean());
    assert!(verdict.matches.is_empty());
}

#[test]
fn test_absence_rule_empty_content() {
    let header = rule(
        RuleDefinition::new("needs-header", "^#!")
            .polarity(Polarity::AbsenceIsViolation)
            .scope(Scope::WholeFile),
    );
    assert!(evaluate(&header, Path::new("run.sh"), "").is_violated());
    assert!(evaluate(&header, Path::new("run.sh"), "#!/bin/sh\n").is_clean());
}

#[test]
fn test_multiple_matches_ordered() {
    let todo = rule(RuleDefinition::new("no-todo", "TODO"));
    let verdict = evaluate(&todo, Path::new("a.txt"), "TODO TODO\nok\nTODO\n");

    let positions: Vec<(u32, u32, usize)> = verdict
        .matches
        .iter()
        .map(|m| (m.line, m.column, m.offset))
        .collect();
    assert_eq!(positions, vec![(1, 1, 0), (1, 6, 5), (3, 1, 13)]);
}

#[test]
fn test_crlf_lines() {
    let todo = rule(RuleDefinition::new("trailing", r"x$"));
    let verdict = evaluate(&todo, Path::new("a.txt"), "ax\r\nbx\r\n");
    let lines: Vec<u32> = verdict.matches.iter().map(|m| m.line).collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn test_crlf_anchors_agree_across_scopes() {
    let content = "ax\r\nbx\r\n.. note:\r\n";
    for scope in [Scope::PerLine, Scope::WholeFile] {
        let trailing = rule(RuleDefinition::new("trailing", r"x$").scope(scope));
        let lines: Vec<u32> = evaluate(&trailing, Path::new("a.txt"), content)
            .matches
            .iter()
            .map(|m| m.line)
            .collect();
        assert_eq!(lines, vec![1, 2], "{scope:?}");

        let directive = rule(RuleDefinition::new("directive", r"^\s*\.\. [a-z]+:$").scope(scope));
        assert!(evaluate(&directive, Path::new("a.rst"), content).is_violated(), "{scope:?}");
    }
}

#[test]
fn test_apply_with_scan_context() -> TestResult {
    let def = RuleDefinition::new("no-print", r"\bprint\(").types(["python"]);
    let rule = Rule::from_definition(&def)?;
    let ctx = ScanContext::new(Path::new("a.py"), "print(1)\n");

    let records = apply(&rule, &ctx);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rule_id.as_str(), "no-print");
    Ok(())
}

#[test]
fn test_evaluate_is_idempotent() {
    let paired = rule(RuleDefinition::new("paired-markup", r"\w``\w").scope(Scope::WholeFile));
    let content = "a ``b``c\n``d``e\n";

    let first = evaluate(&paired, Path::new("a.rst"), content);
    let second = evaluate(&paired, Path::new("a.rst"), content);
    assert_eq!(first, second);
}

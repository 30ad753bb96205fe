#![forbid(unsafe_code)]

//! Verdicts and reports
//!
//! A verdict is the outcome of one rule on one file. A report is the plain
//! union of verdicts: no rule can hide or merge another rule's result.

use crate::engine::matcher::{self, MatchRecord, ScanContext};
use crate::rules::Rule;
use crate::types::RuleId;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Outcome of one rule on one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Clean,
    Violated,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Clean => "clean",
            Outcome::Violated => "violated",
        }
    }
}

/// Per-file, per-rule result together with its evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub rule_id: RuleId,
    pub file: PathBuf,
    pub outcome: Outcome,
    /// Records that made the rule fire; empty when clean
    pub matches: Vec<MatchRecord>,
}

impl Verdict {
    pub fn is_violated(&self) -> bool {
        self.outcome == Outcome::Violated
    }

    pub fn is_clean(&self) -> bool {
        self.outcome == Outcome::Clean
    }
}

/// Evaluate one rule against one file's content
///
/// This is a pure function of its inputs: evaluating the same pair twice
/// gives equal verdicts.
pub fn evaluate(rule: &Rule, file_path: &Path, content: &str) -> Verdict {
    let matches = matcher::apply(rule, &ScanContext::new(file_path, content));
    let outcome = if matches.is_empty() {
        Outcome::Clean
    } else {
        Outcome::Violated
    };

    Verdict {
        rule_id: rule.id().clone(),
        file: file_path.to_path_buf(),
        outcome,
        matches,
    }
}

/// Union of verdicts from one or more files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// All verdicts, clean ones included
    pub verdicts: Vec<Verdict>,
    /// Number of files checked
    pub files_checked: usize,
    /// Number of distinct rules that ran on at least one file
    pub rules_executed: usize,
}

impl Report {
    /// Build a report from verdicts, counting the distinct files and rules
    pub fn from_verdicts(verdicts: Vec<Verdict>) -> Self {
        let files_checked = verdicts.iter().map(|v| &v.file).collect::<HashSet<_>>().len();
        let rules_executed = verdicts
            .iter()
            .map(|v| &v.rule_id)
            .collect::<HashSet<_>>()
            .len();
        Self {
            verdicts,
            files_checked,
            rules_executed,
        }
    }

    /// True when no verdict is violated
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(Verdict::is_clean)
    }

    /// Violated verdicts, in report order
    pub fn violations(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| v.is_violated())
    }

    pub fn violation_count(&self) -> usize {
        self.violations().count()
    }

    /// Total number of match records across violated verdicts
    pub fn total_matches(&self) -> usize {
        self.violations().map(|v| v.matches.len()).sum()
    }

    /// Distinct rule IDs with at least one violation, sorted
    pub fn violated_rules(&self) -> Vec<&RuleId> {
        let mut ids: Vec<&RuleId> = self.violations().map(|v| &v.rule_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

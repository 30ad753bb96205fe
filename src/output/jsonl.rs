#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All match records of violated verdicts (report order)
//! 2. One summary record per verdict (report order)
//! 3. One status record

use crate::engine::Report;
use serde::Serialize;
use std::path::Path;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format the report as JSONL
    pub fn format(&self, report: &Report) -> String {
        let mut output = String::new();

        for verdict in report.violations() {
            for record in &verdict.matches {
                push_line(
                    &mut output,
                    &MatchLine {
                        record_type: "match",
                        rule: record.rule_id.as_str(),
                        file: &record.file,
                        line: record.line,
                        column: record.column,
                        offset: record.offset,
                        snippet: &record.snippet,
                    },
                );
            }
        }

        for verdict in &report.verdicts {
            push_line(
                &mut output,
                &VerdictLine {
                    record_type: "verdict",
                    rule: verdict.rule_id.as_str(),
                    file: &verdict.file,
                    outcome: verdict.outcome.as_str(),
                    matches: verdict.matches.len(),
                },
            );
        }

        push_line(
            &mut output,
            &StatusLine {
                record_type: "status",
                passed: report.passed(),
                files_checked: report.files_checked,
                rules_executed: report.rules_executed,
                verdicts_violated: report.violation_count(),
                total_matches: report.total_matches(),
            },
        );

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct MatchLine<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    file: &'a Path,
    line: u32,
    column: u32,
    offset: usize,
    snippet: &'a str,
}

#[derive(Debug, Serialize)]
struct VerdictLine<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    file: &'a Path,
    outcome: &'static str,
    matches: usize,
}

#[derive(Debug, Serialize)]
struct StatusLine {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    files_checked: usize,
    rules_executed: usize,
    verdicts_violated: usize,
    total_matches: usize,
}

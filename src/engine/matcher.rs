#![forbid(unsafe_code)]

//! Applying a compiled rule to file content
//!
//! Per-line rules see one line at a time (without its terminator); whole-file
//! rules see the content as a single window. Polarity is resolved here: an
//! absence rule yields a single sentinel record (line 0) when its pattern never
//! matches, and nothing otherwise.

use crate::rules::Rule;
use crate::types::{Polarity, RuleId, Scope};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What the matcher is given for one scan
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    /// Path of the file being scanned; only used to label records
    pub file_path: &'a Path,

    /// Full text content of the file
    pub content: &'a str,
}

impl<'a> ScanContext<'a> {
    pub fn new(file_path: &'a Path, content: &'a str) -> Self {
        Self { file_path, content }
    }
}

/// A single match of a rule in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// ID of the rule that produced this record
    pub rule_id: RuleId,

    /// File path the record belongs to
    pub file: PathBuf,

    /// Line where the match starts (1-indexed); 0 for the absence sentinel
    pub line: u32,

    /// Byte column where the match starts (1-indexed); 0 for the absence sentinel
    pub column: u32,

    /// Byte offset of the match start in the whole content
    pub offset: usize,

    /// Matched text
    pub snippet: String,
}

impl MatchRecord {
    /// Returns true for the record emitted when an absence rule finds nothing
    pub fn is_absence(&self) -> bool {
        self.line == 0
    }

    fn absence(rule_id: &RuleId, file: &Path) -> Self {
        Self {
            rule_id: rule_id.clone(),
            file: file.to_path_buf(),
            line: 0,
            column: 0,
            offset: 0,
            snippet: String::new(),
        }
    }
}

/// Apply a rule to content, resolving polarity
///
/// Records are ordered by line, then offset.
pub fn apply(rule: &Rule, ctx: &ScanContext<'_>) -> Vec<MatchRecord> {
    match rule.polarity() {
        Polarity::MatchIsViolation => scan(rule, ctx),
        Polarity::AbsenceIsViolation => {
            if has_match(rule, ctx.content) {
                Vec::new()
            } else {
                vec![MatchRecord::absence(rule.id(), ctx.file_path)]
            }
        }
    }
}

/// Every match of the rule's pattern, ignoring polarity
pub fn scan(rule: &Rule, ctx: &ScanContext<'_>) -> Vec<MatchRecord> {
    let record = |line: u32, column: u32, offset: usize, snippet: &str| MatchRecord {
        rule_id: rule.id().clone(),
        file: ctx.file_path.to_path_buf(),
        line,
        column,
        offset,
        snippet: snippet.to_string(),
    };

    match rule.scope() {
        Scope::PerLine => {
            let mut records = Vec::new();
            for (line_no, line_offset, line) in Lines::new(ctx.content) {
                for m in rule.pattern().find_iter(line) {
                    records.push(record(
                        line_no,
                        (m.start() + 1) as u32,
                        line_offset + m.start(),
                        m.as_str(),
                    ));
                }
            }
            records
        }
        Scope::WholeFile => {
            let line_offsets = compute_line_offsets(ctx.content);
            rule.pattern()
                .find_iter(ctx.content)
                .map(|m| {
                    let (line, column) = offset_to_line_col(m.start(), &line_offsets);
                    record(line, column, m.start(), m.as_str())
                })
                .collect()
        }
    }
}

/// Returns true if the rule's pattern matches anywhere in its scan windows
pub fn has_match(rule: &Rule, content: &str) -> bool {
    match rule.scope() {
        Scope::PerLine => Lines::new(content).any(|(_, _, line)| rule.pattern().is_match(line)),
        Scope::WholeFile => rule.pattern().is_match(content),
    }
}

/// Lines of a text with their 1-based number and byte offset
///
/// A trailing newline does not produce an extra empty line; `\r\n` endings are
/// stripped like `\n`.
struct Lines<'a> {
    rest: &'a str,
    offset: usize,
    line_no: u32,
}

impl<'a> Lines<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            rest: content,
            offset: 0,
            line_no: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (u32, usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (raw, rest) = match self.rest.find('\n') {
            Some(end) => self.rest.split_at(end + 1),
            None => (self.rest, ""),
        };
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let item = (self.line_no + 1, self.offset, line);
        self.line_no += 1;
        self.offset += raw.len();
        self.rest = rest;
        Some(item)
    }
}

/// Compute line start offsets for efficient line/column conversion
///
/// Returns a vector where each element is the byte offset of the start of a line.
/// Line 0 starts at offset 0.
fn compute_line_offsets(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert byte offset to line and column numbers (1-indexed)
///
/// Uses binary search on precomputed line offsets.
fn offset_to_line_col(offset: usize, line_offsets: &[usize]) -> (u32, u32) {
    let line_idx = line_offsets
        .partition_point(|&o| o <= offset)
        .saturating_sub(1);

    let line = (line_idx + 1) as u32;
    let col = (offset - line_offsets[line_idx] + 1) as u32;

    (line, col)
}

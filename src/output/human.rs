#![forbid(unsafe_code)]

//! Human-readable output formatter
//!
//! Violations are grouped by rule, one `path:line:column: snippet` location per
//! match, in the order of the report:
//!
//! ```text
//! python-no-eval
//!   src/a.py:3:5: eval(
//!
//! 1 violated check (1 match) across 2 files.
//! ```

use crate::config::ColorOption;
use crate::engine::{MatchRecord, Report, Verdict};
use std::io;
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human-readable formatter
pub struct HumanFormatter {
    color: ColorOption,
}

impl HumanFormatter {
    /// Creates a formatter with the given color setting
    pub fn new(color: ColorOption) -> Self {
        Self { color }
    }

    /// Format the report as plain text, without color
    pub fn format(&self, report: &Report) -> String {
        let mut buffer = Buffer::no_color();
        // writing to an in-memory buffer cannot fail
        let _ = self.write(&mut buffer, report);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    /// Write the report to stdout, colored per the configured setting
    pub fn write_to_stdout(&self, report: &Report) -> io::Result<()> {
        let choice = match self.color {
            ColorOption::Auto => ColorChoice::Auto,
            ColorOption::Always => ColorChoice::Always,
            ColorOption::Never => ColorChoice::Never,
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, report)
    }

    /// Write the report to any color-capable writer
    pub fn write<W: WriteColor>(&self, out: &mut W, report: &Report) -> io::Result<()> {
        let mut current_rule = None;

        let mut violations: Vec<&Verdict> = report.violations().collect();
        // group by rule, keeping report order within a rule
        violations.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));

        for verdict in violations {
            if current_rule != Some(&verdict.rule_id) {
                if current_rule.is_some() {
                    writeln!(out)?;
                }
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(out, "{}", verdict.rule_id)?;
                out.reset()?;
                writeln!(out)?;
                current_rule = Some(&verdict.rule_id);
            }

            for record in &verdict.matches {
                write_location(out, record)?;
            }
        }

        if current_rule.is_some() {
            writeln!(out)?;
        }
        self.write_summary(out, report)
    }

    fn write_summary<W: WriteColor>(&self, out: &mut W, report: &Report) -> io::Result<()> {
        let files = plural(report.files_checked, "file", "files");

        if report.passed() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "✓")?;
            out.reset()?;
            return writeln!(out, " All checks passed across {files}.");
        }

        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(out, "✗")?;
        out.reset()?;
        writeln!(
            out,
            " {} ({}) across {files}.",
            plural(report.violation_count(), "violated check", "violated checks"),
            plural(report.total_matches(), "match", "matches"),
        )
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new(ColorOption::Auto)
    }
}

fn write_location<W: WriteColor>(out: &mut W, record: &MatchRecord) -> io::Result<()> {
    write!(out, "  ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    if record.is_absence() {
        write!(out, "{}", record.file.display())?;
        out.reset()?;
        return writeln!(out, ": required pattern not found");
    }

    write!(out, "{}:{}:{}", record.file.display(), record.line, record.column)?;
    out.reset()?;
    writeln!(out, ": {}", first_line(&record.snippet))
}

/// Whole-file matches can span lines; show where they start
fn first_line(snippet: &str) -> &str {
    snippet.lines().next().unwrap_or("")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

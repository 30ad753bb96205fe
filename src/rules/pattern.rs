#![forbid(unsafe_code)]

//! Pattern compilation
//!
//! A rule's pattern is compiled once, when the rule is constructed. Besides the
//! main regular expression a pattern may carry its own opt-out markers:
//! `not_followed_by` and `not_preceded_by`. A candidate match is discarded when
//! one of them matches directly after (or directly before) it. This is how a
//! rule encodes exemptions like "a bare `# noqa`, but not `# noqa: F401`"
//! without lookaround support in the regex engine.

use crate::error::PatternError;
use crate::types::Scope;
use regex::{Match, Regex, RegexBuilder};
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input, meta};
use serde::{Deserialize, Serialize};

/// Textual form of a pattern, as handed over by a rule definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSource {
    /// Main regular expression
    pub pattern: String,

    /// Exempts a match when this expression matches starting at the match end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_followed_by: Option<String>,

    /// Exempts a match when this expression matches ending at the match start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_preceded_by: Option<String>,

    /// Case-insensitive matching for the pattern and its exemptions
    #[serde(default)]
    pub ignore_case: bool,
}

impl PatternSource {
    /// Creates a source with only a main pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }
}

/// An executable matcher for one rule
pub struct CompiledPattern {
    source: PatternSource,
    scope: Scope,
    regex: Regex,
    followed_by: Option<meta::Regex>,
    preceded_by: Option<Regex>,
}

impl std::fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("pattern", &self.source.pattern)
            .field("not_followed_by", &self.source.not_followed_by)
            .field("not_preceded_by", &self.source.not_preceded_by)
            .field("ignore_case", &self.source.ignore_case)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Compile a pattern source for the given scope
///
/// Whole-file patterns are compiled in multi-line mode with `.` matching line
/// breaks, so `^` and `$` keep meaning "start/end of a line" when the scanning
/// window spans the whole file. Per-line patterns must not require a line
/// break.
///
/// # Errors
///
/// Returns `PatternError::Syntax` if any of the expressions fails to compile and
/// `PatternError::NewlineInLineScope` if a per-line expression requires a newline.
pub fn compile(source: &PatternSource, scope: Scope) -> Result<CompiledPattern, PatternError> {
    if scope == Scope::PerLine {
        let parts = [
            Some(&source.pattern),
            source.not_followed_by.as_ref(),
            source.not_preceded_by.as_ref(),
        ];
        for text in parts.into_iter().flatten() {
            if let Some(construct) = find_newline_construct(text) {
                return Err(PatternError::NewlineInLineScope {
                    pattern: text.clone(),
                    construct,
                });
            }
        }
    }

    let regex = build("pattern", &source.pattern, scope, source.ignore_case)?;

    let followed_by = source
        .not_followed_by
        .as_deref()
        .map(|text| build_anchored("not_followed_by", text, scope, source.ignore_case))
        .transpose()?;

    let preceded_by = source
        .not_preceded_by
        .as_deref()
        .map(|text| {
            // validate the text on its own before anchoring it
            build("not_preceded_by", text, scope, source.ignore_case)?;
            build(
                "not_preceded_by",
                &format!("(?:{text})\\z"),
                scope,
                source.ignore_case,
            )
        })
        .transpose()?;

    Ok(CompiledPattern {
        source: source.clone(),
        scope,
        regex,
        followed_by,
        preceded_by,
    })
}

fn build(
    part: &'static str,
    text: &str,
    scope: Scope,
    ignore_case: bool,
) -> Result<Regex, PatternError> {
    let whole_file = scope == Scope::WholeFile;
    RegexBuilder::new(text)
        .case_insensitive(ignore_case)
        .multi_line(whole_file)
        .dot_matches_new_line(whole_file)
        .crlf(whole_file)
        .build()
        .map_err(|source| PatternError::Syntax {
            part,
            pattern: text.to_string(),
            source,
        })
}

/// Build an expression for anchored searches at an arbitrary haystack offset
///
/// The search only matches starting exactly at the offset and stops once the
/// expression can no longer match. Assertions like `\b` still see the text
/// before the offset.
fn build_anchored(
    part: &'static str,
    text: &str,
    scope: Scope,
    ignore_case: bool,
) -> Result<meta::Regex, PatternError> {
    // same syntax errors as every other part
    build(part, text, scope, ignore_case)?;

    let whole_file = scope == Scope::WholeFile;
    meta::Regex::builder()
        .syntax(
            syntax::Config::new()
                .case_insensitive(ignore_case)
                .multi_line(whole_file)
                .dot_matches_new_line(whole_file)
                .crlf(whole_file),
        )
        .build(text)
        .map_err(|source| PatternError::Engine {
            part,
            pattern: text.to_string(),
            source,
        })
}

/// Find a construct outside character classes that only matches a line break
fn find_newline_construct(pattern: &str) -> Option<String> {
    let mut chars = pattern.chars().peekable();
    let mut class_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next();
                if class_depth == 0
                    && let Some(e @ ('n' | 'r')) = escaped
                {
                    return Some(format!("\\{e}"));
                }
            }
            '\n' | '\r' if class_depth == 0 => {
                return Some(c.escape_default().to_string());
            }
            '[' => {
                class_depth += 1;
                if chars.peek() == Some(&'^') {
                    chars.next();
                }
                // a leading ']' is a literal member
                if chars.peek() == Some(&']') {
                    chars.next();
                }
            }
            ']' if class_depth > 0 => class_depth -= 1,
            _ => {}
        }
    }

    None
}

impl CompiledPattern {
    /// The source this pattern was compiled from
    pub fn source(&self) -> &PatternSource {
        &self.source
    }

    /// The scope this pattern was compiled for
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Main pattern text
    pub fn as_str(&self) -> &str {
        &self.source.pattern
    }

    /// Iterate over non-exempt, non-overlapping matches in `haystack`
    pub fn find_iter<'p, 'h>(&'p self, haystack: &'h str) -> Matches<'p, 'h> {
        Matches {
            pattern: self,
            haystack,
            pos: 0,
        }
    }

    /// Returns true if the pattern has at least one non-exempt match
    pub fn is_match(&self, haystack: &str) -> bool {
        self.find_iter(haystack).next().is_some()
    }

    fn is_exempt(&self, haystack: &str, m: &Match<'_>) -> bool {
        if let Some(after) = &self.followed_by
            && after.is_match(
                Input::new(haystack)
                    .range(m.end()..)
                    .anchored(Anchored::Yes),
            )
        {
            return true;
        }

        // end-anchored: searched backwards from the match start
        if let Some(before) = &self.preceded_by
            && before.is_match(&haystack[..m.start()])
        {
            return true;
        }

        false
    }
}

/// Iterator over the matches of a [`CompiledPattern`]
///
/// After a match, scanning resumes at its end. After an exempt candidate,
/// scanning resumes one character past the candidate's start, so a later
/// (possibly overlapping) candidate can still match.
#[derive(Debug)]
pub struct Matches<'p, 'h> {
    pattern: &'p CompiledPattern,
    haystack: &'h str,
    pos: usize,
}

impl<'h> Iterator for Matches<'_, 'h> {
    type Item = Match<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.haystack.len() {
            let m = self.pattern.regex.find_at(self.haystack, self.pos)?;

            if self.pattern.is_exempt(self.haystack, &m) {
                self.pos = next_char_boundary(self.haystack, m.start());
                continue;
            }

            self.pos = if m.is_empty() {
                next_char_boundary(self.haystack, m.end())
            } else {
                m.end()
            };
            return Some(m);
        }

        None
    }
}

fn next_char_boundary(s: &str, index: usize) -> usize {
    s[index..]
        .chars()
        .next()
        .map_or(index + 1, |c| index + c.len_utf8())
}

//! Matching, verdicts and parallel evaluation

pub mod classify;
pub mod linter;
pub mod matcher;
pub mod source;
pub mod verdict;

pub use classify::{ContentClassifier, ExtensionClassifier};
pub use linter::Linter;
pub use matcher::{MatchRecord, ScanContext, apply, has_match, scan};
pub use source::{SourceFile, read_source};
pub use verdict::{Outcome, Report, Verdict, evaluate};

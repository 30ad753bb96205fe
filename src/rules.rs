#![forbid(unsafe_code)]

//! Rule definitions, pattern compilation and the rule registry

pub mod builtin;
pub mod pattern;
pub mod registry;
mod rule;

pub use pattern::{CompiledPattern, PatternSource};
pub use registry::RuleRegistry;
pub use rule::{Rule, RuleDefinition};

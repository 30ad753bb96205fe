//! Configuration file parsing and validation

pub mod hookgrep_toml;

pub use hookgrep_toml::{
    CONFIG_FILE, ColorOption, Config, HookgrepMeta, OutputConfig, OutputFormat, RuleSettings, RuleValue,
    RulesConfig,
};

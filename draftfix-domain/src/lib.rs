//! Domain logic: decide which content rules an artifact violates and how to ask for a fix.
//!
//! This crate owns *what* is wrong with a draft and the wording of the repair request. It does
//! not own the loop that drives checks and repairs; that's the `draftfix-core` crate.

mod prompt;
mod rules;

pub use prompt::build_repair_prompt;
pub use rules::{
    DEFAULT_FABRICATION_MARKERS, DEFAULT_MIN_CHARS, Rule, RuleConfig, RuleConfigError, RuleEngine,
    builtin_rule_ids,
};

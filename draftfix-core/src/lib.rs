//! Embeddable core library for draftfix.
//!
//! Drives the check -> repair -> re-check loop without owning any transport or rule
//! semantics. Both collaborators sit behind port traits in [`ports`]:
//! - [`RuleChecker`](ports::RuleChecker): decide whether an artifact needs repair
//! - [`RepairRequester`](ports::RepairRequester): ask a generation service for a corrected artifact
//!
//! The [`adapters`] module provides the rule-engine checker plus deterministic doubles for tests.
//!
//! # Entry points
//!
//! - [`Orchestrator::validate_and_repair`](orchestrator::Orchestrator::validate_and_repair): the bounded loop
//! - [`run_repair`](pipeline::run_repair): the loop plus a [`RepairReport`](draftfix_types::report::RepairReport)

pub mod adapters;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use error::{RepairError, RepairServiceError};
pub use orchestrator::{MAX_REPAIR_DEPTH, Orchestrator};

// Re-export the prompt builder so embedders don't need draftfix-domain directly.
pub use draftfix_domain::build_repair_prompt;

//! Shared DTOs (schemas-as-code) for the draftfix workspace.
//!
//! # Design constraints
//! - Artifacts are immutable snapshots: a repair produces a new value, never an in-place edit.
//! - These types are serialized to disk by the CLI; prefer adding optional fields over changing semantics.

pub mod artifact;
pub mod outcome;
pub mod platform;
pub mod report;

pub use artifact::{Artifact, ArtifactId, Locale};
pub use outcome::CheckOutcome;
pub use platform::{Platform, UnknownPlatform};

/// Schema identifiers.
pub mod schema {
    pub const DRAFTFIX_REPORT_V1: &str = "draftfix.report.v1";
}

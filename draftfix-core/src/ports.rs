//! Port traits abstracting the two collaborators away from the loop.

use crate::error::RepairServiceError;
use async_trait::async_trait;
use draftfix_types::{Artifact, CheckOutcome};

/// Decides whether an artifact violates any acceptance rule.
///
/// Must be total: every call eventually returns an outcome. The orchestrator imposes no
/// timeout of its own.
#[async_trait]
pub trait RuleChecker: Send + Sync {
    async fn check(&self, artifact: &Artifact) -> CheckOutcome;
}

/// Produces a corrected artifact from a repair instruction.
///
/// `current` is the artifact the instruction was built from, so implementations can carry
/// its id and locale forward. Retries, backoff, and caching belong inside implementations;
/// the orchestrator propagates any error unchanged.
#[async_trait]
pub trait RepairRequester: Send + Sync {
    async fn repair(
        &self,
        instruction: &str,
        current: &Artifact,
    ) -> Result<Artifact, RepairServiceError>;
}

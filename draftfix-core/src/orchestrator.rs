//! The bounded check -> repair -> re-check loop.

use crate::error::{RepairError, RepairResult};
use crate::ports::{RepairRequester, RuleChecker};
use draftfix_domain::build_repair_prompt;
use draftfix_types::Artifact;
use tracing::{debug, info, warn};

/// Maximum number of repair requests for one run.
///
/// A run makes at most `MAX_REPAIR_DEPTH` repair calls and `MAX_REPAIR_DEPTH + 1` checks:
/// the output of the last allowed repair is still checked before the run gives up.
pub const MAX_REPAIR_DEPTH: u32 = 3;

/// Drives one artifact through checks and repairs until it is compliant or the
/// repair budget is spent.
///
/// Holds only shared references to its collaborators and no per-run state, so one
/// orchestrator can serve any number of concurrent runs.
#[derive(Clone, Copy)]
pub struct Orchestrator<'a> {
    checker: &'a dyn RuleChecker,
    requester: &'a dyn RepairRequester,
}

impl<'a> Orchestrator<'a> {
    pub fn new(checker: &'a dyn RuleChecker, requester: &'a dyn RepairRequester) -> Self {
        Self { checker, requester }
    }

    /// Validate `artifact`, repairing it as needed.
    ///
    /// Returns the first compliant snapshot (the input itself when it is already clean).
    ///
    /// # Errors
    ///
    /// - [`RepairError::MaxRepairAttemptsExceeded`] when the artifact still violates rules
    ///   after [`MAX_REPAIR_DEPTH`] repairs.
    /// - [`RepairError::RepairService`] as soon as the requester fails; nothing is retried here.
    pub async fn validate_and_repair(&self, artifact: Artifact) -> RepairResult<Artifact> {
        self.validate_and_repair_from(artifact, 0).await
    }

    /// Like [`validate_and_repair`](Self::validate_and_repair), resuming a run that has
    /// already consumed `depth` repairs.
    ///
    /// A `depth` past [`MAX_REPAIR_DEPTH`] is refused without running a check.
    pub async fn validate_and_repair_from(
        &self,
        artifact: Artifact,
        depth: u32,
    ) -> RepairResult<Artifact> {
        let mut current = artifact;
        let mut depth = depth;

        if depth > MAX_REPAIR_DEPTH {
            warn!(artifact_id = %current.id(), depth, "repair budget already spent");
            return Err(RepairError::MaxRepairAttemptsExceeded {
                artifact_id: current.id().clone(),
                attempts: depth,
                violations: Vec::new(),
                last_revision: None,
            });
        }

        loop {
            debug!(artifact_id = %current.id(), depth, revision = current.revision(), "checking artifact");
            let outcome = self.checker.check(&current).await;
            if !outcome.needs_repair() {
                debug!(artifact_id = %current.id(), depth, "artifact compliant");
                return Ok(current);
            }

            let violations = outcome.into_violations();
            if depth >= MAX_REPAIR_DEPTH {
                warn!(
                    artifact_id = %current.id(),
                    attempts = depth,
                    violations = ?violations,
                    "repair attempts exhausted"
                );
                return Err(RepairError::MaxRepairAttemptsExceeded {
                    artifact_id: current.id().clone(),
                    attempts: depth,
                    violations,
                    last_revision: Some(current.revision()),
                });
            }

            let instruction = build_repair_prompt(&current, &violations);
            info!(
                artifact_id = %current.id(),
                depth,
                violations = violations.len(),
                "requesting repair"
            );
            let repaired = match self.requester.repair(&instruction, &current).await {
                Ok(a) => a,
                Err(e) => {
                    warn!(artifact_id = %current.id(), depth, error = %e, "repair request failed");
                    return Err(e.into());
                }
            };

            // Identity is not enforced; a requester may reassign it.
            if repaired.id() != current.id() {
                debug!(from = %current.id(), to = %repaired.id(), "repair reassigned artifact id");
            }
            if repaired.locale() != current.locale() {
                warn!(
                    artifact_id = %repaired.id(),
                    from = %current.locale(),
                    to = %repaired.locale(),
                    "repair changed artifact locale"
                );
            }

            current = repaired;
            depth += 1;
        }
    }
}

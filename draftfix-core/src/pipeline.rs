//! The repair loop wrapped with run bookkeeping.
//!
//! I/O-agnostic: the caller decides where the repaired artifact and the report go.

use crate::error::{RepairError, RepairResult};
use crate::orchestrator::Orchestrator;
use crate::ports::{RepairRequester, RuleChecker};
use crate::settings::RepairSettings;
use chrono::Utc;
use draftfix_types::Artifact;
use draftfix_types::report::{RepairReport, RepairStatus, ReportArtifact, RunInfo, ToolInfo};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Outcome of [`run_repair`].
#[derive(Debug)]
pub struct RepairOutcome {
    pub result: RepairResult<Artifact>,
    pub report: RepairReport,
}

impl RepairOutcome {
    /// 0 when compliant, otherwise the error's exit code.
    pub fn exit_code(&self) -> u8 {
        match &self.result {
            Ok(_) => 0,
            Err(e) => e.exit_code(),
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.result.as_ref().ok()
    }
}

/// Run the loop on `artifact` and describe the run in a [`RepairReport`].
///
/// On success the report describes the compliant snapshot. On failure it describes the
/// input, since the loop does not hand back intermediate drafts.
pub async fn run_repair(
    settings: &RepairSettings,
    checker: &dyn RuleChecker,
    requester: &dyn RepairRequester,
    artifact: Artifact,
    tool: ToolInfo,
) -> RepairOutcome {
    let started_at = Utc::now();
    let input = artifact.clone();

    let result = Orchestrator::new(checker, requester)
        .validate_and_repair_from(artifact, settings.resume_depth)
        .await;

    let run = RunInfo {
        started_at,
        ended_at: Some(Utc::now()),
    };
    let described = result.as_ref().unwrap_or(&input);
    let mut report = RepairReport::new(
        tool,
        run,
        report_artifact(described, settings),
        status_of(&result),
    );

    if let Err(e) = &result {
        report.message = Some(e.to_string());
        if let RepairError::MaxRepairAttemptsExceeded {
            attempts,
            violations,
            last_revision,
            ..
        } = e
        {
            // `artifact` describes the input; the violations belong to `last_revision`.
            report.violations = violations.clone();
            let mut data = serde_json::json!({ "attempts": attempts });
            if let Some(revision) = last_revision {
                data["last_revision"] = serde_json::json!(revision);
            }
            report.data = Some(data);
        }
    }

    debug!(
        artifact_id = %described.id(),
        status = ?report.status,
        "repair run finished"
    );
    RepairOutcome { result, report }
}

fn status_of(result: &RepairResult<Artifact>) -> RepairStatus {
    match result {
        Ok(_) => RepairStatus::Compliant,
        Err(RepairError::MaxRepairAttemptsExceeded { .. }) => RepairStatus::NeedsReview,
        Err(RepairError::RepairService(_)) => RepairStatus::ServiceError,
    }
}

fn report_artifact(artifact: &Artifact, settings: &RepairSettings) -> ReportArtifact {
    ReportArtifact {
        id: artifact.id().to_string(),
        locale: artifact.locale().to_string(),
        revision: artifact.revision(),
        platform: settings.platform.map(|p| p.as_str().to_string()),
        content_sha256: Some(content_sha256(artifact.content())),
    }
}

/// Lowercase hex sha256 of `content`.
pub fn content_sha256(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

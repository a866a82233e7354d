use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Machine-readable record of one validate-and-repair run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub artifact: ReportArtifact,
    pub status: RepairStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Violations from the last check that ran, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RepairReport {
    pub fn new(tool: ToolInfo, run: RunInfo, artifact: ReportArtifact, status: RepairStatus) -> Self {
        Self {
            schema: crate::schema::DRAFTFIX_REPORT_V1.to_string(),
            tool,
            run,
            artifact,
            status,
            message: None,
            violations: vec![],
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub id: String,
    pub locale: String,
    pub revision: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Hex sha256 of the content this report describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sha256: Option<String>,
}

/// Terminal state of a run.
///
/// `NeedsReview` means automated repair is exhausted and a human has to look;
/// `ServiceError` means the repair backend failed and the run may be retried later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    Compliant,
    NeedsReview,
    ServiceError,
}

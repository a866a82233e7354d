//! Error types for the repair loop.
//!
//! This module defines error types that distinguish between:
//! - Exhausted repair (exit code 2): the artifact needs a human, retrying the pipeline won't help
//! - Service failures (exit code 1): the repair backend failed, the whole run may be retried later

use draftfix_types::ArtifactId;
use thiserror::Error;

/// Failure reported by a [`RepairRequester`](crate::ports::RepairRequester).
///
/// The loop treats this as opaque and propagates it unchanged; the variants exist so
/// requesters can decide internally what to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairServiceError {
    /// The service refused the call because of rate limiting.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// The service answered with a non-success status.
    #[error("repair service returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never got a response (connect failure, timeout, reset).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A response arrived but did not contain usable text.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// The requester could not be built or was misconfigured.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl RepairServiceError {
    /// Whether a requester may reasonably try the same call again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::MalformedResponse { .. } | Self::Configuration { .. } => false,
        }
    }
}

/// Terminal failure of one validate-and-repair run.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Automated repair is exhausted; route the artifact to manual review.
    #[error(
        "artifact {artifact_id} still violates rules after {attempts} repair attempts; manual review required"
    )]
    MaxRepairAttemptsExceeded {
        artifact_id: ArtifactId,
        attempts: u32,
        /// Violations from the last check, empty when the run was refused before checking.
        violations: Vec<String>,
        /// Revision of the snapshot those violations were found in.
        last_revision: Option<u32>,
    },

    /// The repair service failed; propagated unchanged from the requester.
    #[error("repair service failure: {0}")]
    RepairService(#[from] RepairServiceError),
}

impl RepairError {
    /// Returns true if the artifact should go to a human review queue.
    pub fn needs_manual_review(&self) -> bool {
        matches!(self, RepairError::MaxRepairAttemptsExceeded { .. })
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            RepairError::MaxRepairAttemptsExceeded { .. } => 2,
            RepairError::RepairService(_) => 1,
        }
    }

    /// The underlying service error, if this is one.
    pub fn service_error(&self) -> Option<&RepairServiceError> {
        match self {
            RepairError::RepairService(e) => Some(e),
            RepairError::MaxRepairAttemptsExceeded { .. } => None,
        }
    }
}

/// Result type alias using RepairError.
pub type RepairResult<T> = Result<T, RepairError>;

use serde::{Deserialize, Serialize};

/// Result of one validation pass over an artifact.
///
/// Only the violation list is stored; `needs_repair` is derived from it, so a clean
/// outcome can never carry violations and a dirty one can never be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Human-readable violation descriptions, in rule evaluation order.
    #[serde(default)]
    violations: Vec<String>,
}

impl CheckOutcome {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn from_violations(violations: Vec<String>) -> Self {
        Self { violations }
    }

    pub fn needs_repair(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<String> {
        self.violations
    }
}

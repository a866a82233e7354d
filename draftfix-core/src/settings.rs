//! Clap-free settings for the repair pipeline.

use draftfix_types::Platform;

/// Settings for one [`run_repair`](crate::pipeline::run_repair) call.
#[derive(Debug, Clone, Default)]
pub struct RepairSettings {
    /// Target platform recorded in the report.
    pub platform: Option<Platform>,

    /// Repairs already spent on this artifact by an earlier run.
    pub resume_depth: u32,
}

use super::Rule;
use draftfix_types::{Artifact, Platform};

pub(super) const RULE_ID: &str = "platform-length";

/// Content must fit the target platform's character cap.
pub(super) struct PlatformLengthRule {
    platform: Platform,
}

impl PlatformLengthRule {
    pub(super) fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Rule for PlatformLengthRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn evaluate(&self, artifact: &Artifact) -> Vec<String> {
        // Characters, not bytes.
        let len = artifact.content().chars().count();
        let max = self.platform.max_chars();
        if len > max {
            vec![format!(
                "Content exceeds {} limit: {} > {} chars",
                self.platform, len, max
            )]
        } else {
            vec![]
        }
    }
}

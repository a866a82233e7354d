use super::Rule;
use draftfix_types::Artifact;

pub(super) const RULE_ID: &str = "non-empty";

pub const DEFAULT_MIN_CHARS: usize = 50;

pub(super) struct NonEmptyRule {
    min_chars: usize,
}

impl NonEmptyRule {
    pub(super) fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl Rule for NonEmptyRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn evaluate(&self, artifact: &Artifact) -> Vec<String> {
        let trimmed = artifact.content().trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.min_chars {
            vec!["Content is empty or too short".to_string()]
        } else {
            vec![]
        }
    }
}

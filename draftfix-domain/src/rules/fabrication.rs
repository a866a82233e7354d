use super::{Rule, RuleConfigError};
use draftfix_types::Artifact;
use regex::{Regex, RegexBuilder};

pub(super) const RULE_ID: &str = "fabrication-marker";

/// Phrases that signal an invented personal anecdote.
pub const DEFAULT_FABRICATION_MARKERS: &[&str] = &[
    "once told me",
    "a mentee of mine",
    "I remember when",
    "true story",
    "fun fact about me",
];

/// Flags first-person anecdote phrasing the author never supplied.
pub(super) struct FabricationMarkerRule {
    markers: Vec<(String, Regex)>,
}

impl FabricationMarkerRule {
    pub(super) fn defaults() -> Self {
        let markers = DEFAULT_FABRICATION_MARKERS
            .iter()
            .filter_map(|m| compile(m).ok().map(|re| (m.to_string(), re)))
            .collect();
        Self { markers }
    }

    pub(super) fn new(markers: &[String]) -> Result<Self, RuleConfigError> {
        let markers = markers
            .iter()
            .map(|m| compile(m).map(|re| (m.clone(), re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { markers })
    }
}

/// Whole-phrase, case-insensitive matcher for a literal marker.
fn compile(marker: &str) -> Result<Regex, RuleConfigError> {
    let trimmed = marker.trim();
    if trimmed.is_empty() {
        return Err(RuleConfigError::InvalidMarker {
            marker: marker.to_string(),
            message: "marker is empty".to_string(),
        });
    }
    // `\b` beside punctuation would demand a word character on the far side.
    let lead = if trimmed.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if trimmed.ends_with(is_word_char) { r"\b" } else { "" };
    RegexBuilder::new(&format!("{lead}{}{trail}", regex::escape(trimmed)))
        .case_insensitive(true)
        .build()
        .map_err(|e| RuleConfigError::InvalidMarker {
            marker: marker.to_string(),
            message: e.to_string(),
        })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Rule for FabricationMarkerRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn evaluate(&self, artifact: &Artifact) -> Vec<String> {
        self.markers
            .iter()
            .filter(|(_, re)| re.is_match(artifact.content()))
            .map(|(marker, _)| format!("Fabrication marker detected: '{marker}'"))
            .collect()
    }
}

use draftfix_types::{Artifact, CheckOutcome, Platform};
use thiserror::Error;
use tracing::debug;

mod fabrication;
mod non_empty;
mod platform_length;

pub use fabrication::DEFAULT_FABRICATION_MARKERS;
pub use non_empty::DEFAULT_MIN_CHARS;

/// One acceptance rule.
///
/// A rule returns every violation it finds, already phrased for a human (and for the
/// repair prompt). An empty vec means the rule passed.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;

    fn evaluate(&self, artifact: &Artifact) -> Vec<String>;
}

/// Knobs for the built-in rules.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Target platform; the length rule is skipped when unset.
    pub platform: Option<Platform>,
    pub min_chars: usize,
    /// Marker phrases checked in addition to [`DEFAULT_FABRICATION_MARKERS`].
    pub extra_fabrication_markers: Vec<String>,
    /// Rule ids to skip.
    pub disabled: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            platform: None,
            min_chars: DEFAULT_MIN_CHARS,
            extra_fabrication_markers: Vec::new(),
            disabled: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleConfigError {
    #[error("unknown rule id '{id}' (known: {known})")]
    UnknownRule { id: String, known: String },

    #[error("invalid fabrication marker '{marker}': {message}")]
    InvalidMarker { marker: String, message: String },
}

/// Ids of the built-in rules, in evaluation order.
pub fn builtin_rule_ids() -> &'static [&'static str] {
    &[
        fabrication::RULE_ID,
        platform_length::RULE_ID,
        non_empty::RULE_ID,
    ]
}

/// Ordered set of rules evaluated against each artifact.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_rules(vec![
            Box::new(fabrication::FabricationMarkerRule::defaults()),
            Box::new(non_empty::NonEmptyRule::new(DEFAULT_MIN_CHARS)),
        ])
    }
}

impl RuleEngine {
    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleConfigError> {
        for id in &config.disabled {
            if !builtin_rule_ids().contains(&id.as_str()) {
                return Err(RuleConfigError::UnknownRule {
                    id: id.clone(),
                    known: builtin_rule_ids().join(", "),
                });
            }
        }
        let enabled = |id: &str| !config.disabled.iter().any(|d| d == id);

        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        if enabled(fabrication::RULE_ID) {
            let mut markers: Vec<String> = DEFAULT_FABRICATION_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect();
            for extra in &config.extra_fabrication_markers {
                if !markers.iter().any(|m| m.eq_ignore_ascii_case(extra)) {
                    markers.push(extra.clone());
                }
            }
            rules.push(Box::new(fabrication::FabricationMarkerRule::new(&markers)?));
        }
        if enabled(platform_length::RULE_ID)
            && let Some(platform) = config.platform
        {
            rules.push(Box::new(platform_length::PlatformLengthRule::new(platform)));
        }
        if enabled(non_empty::RULE_ID) {
            rules.push(Box::new(non_empty::NonEmptyRule::new(config.min_chars)));
        }
        Ok(Self { rules })
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Run every rule in order and collect the violations.
    pub fn evaluate(&self, artifact: &Artifact) -> CheckOutcome {
        let mut violations = Vec::new();
        for rule in &self.rules {
            let mut found = rule.evaluate(artifact);
            if !found.is_empty() {
                debug!(
                    rule = rule.id(),
                    artifact_id = %artifact.id(),
                    count = found.len(),
                    "rule reported violations"
                );
            }
            violations.append(&mut found);
        }
        CheckOutcome::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftfix_types::{ArtifactId, Locale};
    use pretty_assertions::assert_eq;

    fn artifact(content: &str) -> Artifact {
        Artifact::new(ArtifactId::new("t"), content, Locale::default())
    }

    fn long_clean_text() -> String {
        "Shipping a SwiftUI app taught our team to profile before optimizing anything.".to_string()
    }

    #[test]
    fn clean_content_passes_default_engine() {
        let outcome = RuleEngine::default().evaluate(&artifact(&long_clean_text()));
        assert!(!outcome.needs_repair());
    }

    #[test]
    fn violations_follow_rule_order() {
        let config = RuleConfig {
            platform: Some(Platform::X),
            ..RuleConfig::default()
        };
        let engine = RuleEngine::from_config(&config).unwrap();
        let text = format!("True story: {}", "a".repeat(300));

        let outcome = engine.evaluate(&artifact(&text));
        assert_eq!(
            outcome.violations(),
            [
                "Fabrication marker detected: 'true story'".to_string(),
                format!("Content exceeds x limit: {} > 280 chars", text.chars().count()),
            ]
        );
    }

    #[test]
    fn empty_content_only_trips_non_empty() {
        let outcome = RuleEngine::default().evaluate(&artifact("   "));
        assert_eq!(outcome.violations(), ["Content is empty or too short"]);
    }

    #[test]
    fn length_rule_skipped_without_platform() {
        let engine = RuleEngine::from_config(&RuleConfig::default()).unwrap();
        assert_eq!(engine.rule_ids(), vec!["fabrication-marker", "non-empty"]);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = RuleConfig {
            platform: Some(Platform::Medium),
            disabled: vec!["non-empty".to_string()],
            ..RuleConfig::default()
        };
        let engine = RuleEngine::from_config(&config).unwrap();
        assert_eq!(engine.rule_ids(), vec!["fabrication-marker", "platform-length"]);
        assert!(!engine.evaluate(&artifact("")).needs_repair());
    }

    #[test]
    fn unknown_disabled_rule_is_rejected() {
        let config = RuleConfig {
            disabled: vec!["spelling".to_string()],
            ..RuleConfig::default()
        };
        let err = RuleEngine::from_config(&config).err().expect("unknown rule");
        assert!(err.to_string().contains("spelling"));
        assert!(err.to_string().contains("fabrication-marker"));
    }

    #[test]
    fn extra_markers_extend_defaults() {
        let config = RuleConfig {
            extra_fabrication_markers: vec!["my old boss said".to_string()],
            ..RuleConfig::default()
        };
        let engine = RuleEngine::from_config(&config).unwrap();
        let text = format!("{} My old boss said ship it.", long_clean_text());
        assert_eq!(
            engine.evaluate(&artifact(&text)).violations(),
            ["Fabrication marker detected: 'my old boss said'"]
        );
    }

    #[test]
    fn builtin_ids_are_stable() {
        assert_eq!(
            builtin_rule_ids(),
            &["fabrication-marker", "platform-length", "non-empty"]
        );
    }
}

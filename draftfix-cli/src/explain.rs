//! Rule explanations for the `draftfix explain` and `draftfix list-rules` commands.

/// Information about one built-in rule.
#[derive(Debug, Clone)]
pub struct RuleExplanation {
    /// Rule id as used in `[rules].disabled` (e.g., "non-empty").
    pub id: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// What the rule checks and the violation text it produces.
    pub description: &'static str,
    /// How to fix a violation by hand.
    pub remediation: &'static str,
    /// Config keys that tune the rule.
    pub settings: &'static [&'static str],
}

/// Registry of all built-in rules, in evaluation order.
pub static RULE_REGISTRY: &[RuleExplanation] = &[
    RuleExplanation {
        id: "fabrication-marker",
        title: "Fabrication Markers",
        description: r#"Flags phrases that usually introduce an invented anecdote or credential.

Each marker is matched case-insensitively as a whole phrase. The built-in markers are:
- "once told me"
- "a mentee of mine"
- "I remember when"
- "true story"
- "fun fact about me"

Every marker found yields one violation:

    Fabrication marker detected: '<phrase>'"#,
        remediation: r#"Remove the anecdote, or restate it using only facts present in the
author's profile. If a marker is legitimate for your voice, disable the rule:

    [rules]
    disabled = ["fabrication-marker"]"#,
        settings: &["rules.extra_fabrication_markers", "rules.disabled"],
    },
    RuleExplanation {
        id: "platform-length",
        title: "Platform Length Limit",
        description: r#"Checks the character count (not bytes) against the target platform's limit:
- x: 280
- linkedin: 3000
- medium: 50000

Only active when a platform is given (`--platform`). The violation reads:

    Content exceeds <platform> limit: <n> > <max> chars"#,
        remediation: r#"Shorten the post, or split it into a thread for x. Repair requests pass the
limit back to the model in the violation text."#,
        settings: &["--platform", "rules.disabled"],
    },
    RuleExplanation {
        id: "non-empty",
        title: "Minimum Content",
        description: r#"Rejects content whose trimmed length is below the minimum (default 50 chars).
Catches empty replies and truncated generations. The violation reads:

    Content is empty or too short"#,
        remediation: r#"Regenerate the draft. For intentionally short posts lower the threshold:

    [rules]
    min_chars = 20"#,
        settings: &["rules.min_chars", "--min-chars", "rules.disabled"],
    },
];

/// Look up a rule by id, ignoring case and treating `_` as `-`.
pub fn lookup_rule(query: &str) -> Option<&'static RuleExplanation> {
    let normalized = query.trim().to_lowercase().replace('_', "-");
    RULE_REGISTRY.iter().find(|rule| rule.id == normalized)
}

/// List all rule ids.
pub fn list_rule_ids() -> Vec<&'static str> {
    RULE_REGISTRY.iter().map(|r| r.id).collect()
}

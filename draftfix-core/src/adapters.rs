//! Port implementations: the rule-engine checker plus deterministic doubles.

use crate::error::RepairServiceError;
use crate::ports::{RepairRequester, RuleChecker};
use async_trait::async_trait;
use draftfix_domain::RuleEngine;
use draftfix_types::{Artifact, CheckOutcome};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Checks artifacts against a [`RuleEngine`].
pub struct RuleEngineChecker {
    engine: RuleEngine,
}

impl RuleEngineChecker {
    pub fn new(engine: RuleEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }
}

#[async_trait]
impl RuleChecker for RuleEngineChecker {
    async fn check(&self, artifact: &Artifact) -> CheckOutcome {
        self.engine.evaluate(artifact)
    }
}

/// Reports every artifact as compliant.
///
/// Stands in for a rule engine that has not been wired up yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughChecker;

#[async_trait]
impl RuleChecker for PassthroughChecker {
    async fn check(&self, _artifact: &Artifact) -> CheckOutcome {
        CheckOutcome::clean()
    }
}

/// Checker that replays a fixed sequence of outcomes.
///
/// Once the script runs out every further check returns the fallback outcome
/// (clean unless built with [`ScriptedRuleChecker::always`]). Every checked artifact is recorded.
#[derive(Debug)]
pub struct ScriptedRuleChecker {
    script: Mutex<VecDeque<CheckOutcome>>,
    fallback: CheckOutcome,
    checked: Mutex<Vec<Artifact>>,
}

impl ScriptedRuleChecker {
    pub fn new(script: Vec<CheckOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: CheckOutcome::clean(),
            checked: Mutex::new(Vec::new()),
        }
    }

    /// Returns `outcome` for every check.
    pub fn always(outcome: CheckOutcome) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: outcome,
            checked: Mutex::new(Vec::new()),
        }
    }

    /// Dirty for the first `rounds` checks, clean afterwards.
    pub fn dirty_for(rounds: usize, violations: Vec<String>) -> Self {
        let outcome = CheckOutcome::from_violations(violations);
        Self::new(vec![outcome; rounds])
    }

    /// Artifacts passed to `check`, in call order.
    pub fn checked(&self) -> Vec<Artifact> {
        lock(&self.checked).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.checked).len()
    }
}

#[async_trait]
impl RuleChecker for ScriptedRuleChecker {
    async fn check(&self, artifact: &Artifact) -> CheckOutcome {
        lock(&self.checked).push(artifact.clone());
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Requester that rewrites deterministically without any service.
///
/// Call `n` (0-based) returns `current.with_content("repaired draft #n+1")` unless a
/// scripted content or failure is registered for that call. Instructions are recorded.
#[derive(Debug, Default)]
pub struct ScriptedRepairRequester {
    contents: BTreeMap<usize, String>,
    failures: BTreeMap<usize, RepairServiceError>,
    instructions: Mutex<Vec<String>>,
}

impl ScriptedRepairRequester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `content` as the repaired text on call `index`.
    pub fn with_content_at(mut self, index: usize, content: impl Into<String>) -> Self {
        self.contents.insert(index, content.into());
        self
    }

    /// Fail call `index` with `err`.
    pub fn with_failure_at(mut self, index: usize, err: RepairServiceError) -> Self {
        self.failures.insert(index, err);
        self
    }

    /// Instructions received, in call order.
    pub fn instructions(&self) -> Vec<String> {
        lock(&self.instructions).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.instructions).len()
    }
}

#[async_trait]
impl RepairRequester for ScriptedRepairRequester {
    async fn repair(
        &self,
        instruction: &str,
        current: &Artifact,
    ) -> Result<Artifact, RepairServiceError> {
        let index = {
            let mut seen = lock(&self.instructions);
            seen.push(instruction.to_string());
            seen.len() - 1
        };

        if let Some(err) = self.failures.get(&index) {
            debug!(call = index, "scripted repair failure");
            return Err(err.clone());
        }

        let content = self
            .contents
            .get(&index)
            .cloned()
            .unwrap_or_else(|| format!("repaired draft #{}", index + 1));
        Ok(current.with_content(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftfix_domain::{RuleConfig, RuleEngine};
    use draftfix_types::{ArtifactId, Locale, Platform};

    fn artifact(content: &str) -> Artifact {
        Artifact::new(ArtifactId::new("a"), content, Locale::default())
    }

    #[tokio::test]
    async fn rule_engine_checker_delegates() {
        let engine = RuleEngine::from_config(&RuleConfig {
            platform: Some(Platform::X),
            ..RuleConfig::default()
        })
        .unwrap();
        let checker = RuleEngineChecker::new(engine);

        let outcome = checker.check(&artifact("short")).await;
        assert_eq!(outcome.violations(), ["Content is empty or too short"]);
    }

    #[tokio::test]
    async fn scripted_checker_replays_then_falls_back() {
        let checker = ScriptedRuleChecker::dirty_for(2, vec!["tone".to_string()]);
        let a = artifact("x");

        assert!(checker.check(&a).await.needs_repair());
        assert!(checker.check(&a).await.needs_repair());
        assert!(!checker.check(&a).await.needs_repair());
        assert_eq!(checker.call_count(), 3);
    }

    #[tokio::test]
    async fn always_checker_never_runs_out() {
        let checker = ScriptedRuleChecker::always(CheckOutcome::from_violations(vec![
            "safety".to_string(),
        ]));
        for _ in 0..10 {
            assert!(checker.check(&artifact("x")).await.needs_repair());
        }
    }

    #[tokio::test]
    async fn scripted_requester_numbers_drafts() {
        let requester = ScriptedRepairRequester::new().with_content_at(1, "custom");
        let a = artifact("x");

        let first = requester.repair("fix it", &a).await.unwrap();
        let second = requester.repair("fix again", &first).await.unwrap();

        assert_eq!(first.content(), "repaired draft #1");
        assert_eq!(second.content(), "custom");
        assert_eq!(second.revision(), 2);
        assert_eq!(second.id(), a.id());
        assert_eq!(requester.instructions(), vec!["fix it", "fix again"]);
    }

    #[tokio::test]
    async fn scripted_requester_fails_on_schedule() {
        let err = RepairServiceError::RateLimited {
            message: "429".to_string(),
        };
        let requester = ScriptedRepairRequester::new().with_failure_at(0, err.clone());

        assert_eq!(requester.repair("i", &artifact("x")).await, Err(err));
        assert_eq!(requester.call_count(), 1);
    }
}

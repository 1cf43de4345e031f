//! Runtime instances of a definition.
//!
//! A [`Run`] records *what has happened so far* for one execution of a
//! [`Definition`]. It holds no transition logic: state and the finished flag
//! are only changed by the [`Coordinator`](crate::Coordinator).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::core::definition::Definition;
use crate::core::facts::FactStore;
use crate::core::types::{FactScope, FactValue};
use crate::error::EngineError;

/// Opaque 128-bit random run identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub(crate) fn random() -> Self {
        RunId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct Run {
    id: RunId,
    definition: Arc<Definition>,
    state: String,
    facts: FactStore,
    finished: bool,
}

impl Run {
    pub(crate) fn new(id: RunId, definition: Arc<Definition>) -> Self {
        let state = definition.initial().to_string();
        Self {
            id,
            definition,
            state,
            facts: FactStore::new(),
            finished: false,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True if the current state is one of the definition's terminal states.
    pub fn is_terminal(&self) -> bool {
        self.definition.is_terminal(&self.state)
    }

    /// Report a step-scoped fact (cleared on the next transition).
    pub fn report_predicate(&mut self, name: impl Into<String>, value: impl Into<FactValue>) {
        self.facts.report(name, value, FactScope::Step);
    }

    pub fn report_predicate_in(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FactValue>,
        scope: FactScope,
    ) {
        self.facts.report(name, value, scope);
    }

    /// Report a fact whose scope arrives as text (e.g. from a message payload).
    ///
    /// Unknown scopes are rejected and nothing is written.
    pub fn report_predicate_as(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FactValue>,
        scope: &str,
    ) -> Result<(), EngineError> {
        let scope: FactScope = scope.parse()?;
        self.facts.report(name, value, scope);
        Ok(())
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            id: self.id,
            definition: self.definition.name().to_string(),
            state: self.state.clone(),
            finished: self.finished,
            facts: self.facts.snapshot(),
        }
    }

    /// Move to `target`, dropping step facts. Finishes the run on terminal entry.
    pub(crate) fn enter(&mut self, target: &str) {
        self.state = target.to_string();
        self.facts.clear_step();
        if self.is_terminal() {
            self.finished = true;
        }
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
    }
}

/// Owned, serializable view of a run at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSnapshot {
    pub id: RunId,
    pub definition: String,
    pub state: String,
    pub finished: bool,
    pub facts: BTreeMap<String, FactValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::approval_definition;

    fn run() -> Run {
        Run::new(RunId::random(), Arc::new(approval_definition()))
    }

    #[test]
    fn new_run_starts_at_initial_state() {
        let run = run();
        assert_eq!(run.state(), "draft");
        assert!(!run.is_finished());
        assert!(!run.is_terminal());
        assert!(run.facts().is_empty());
    }

    #[test]
    fn report_predicate_defaults_to_step_scope() {
        let mut run = run();
        run.report_predicate("review_ok", true);
        assert_eq!(
            run.facts().step_facts().get("review_ok"),
            Some(&FactValue::Bool(true))
        );
        assert!(run.facts().run_facts().is_empty());
    }

    #[test]
    fn invalid_scope_writes_nothing() {
        let mut run = run();
        let err = run
            .report_predicate_as("review_ok", true, "forever")
            .expect_err("expected invalid scope");
        assert_eq!(err, EngineError::InvalidScope("forever".to_string()));
        assert!(run.facts().is_empty());

        run.report_predicate_as("review_ok", true, "run")
            .expect("valid scope");
        assert_eq!(run.facts().run_facts().len(), 1);
    }

    #[test]
    fn entering_terminal_state_finishes_run() {
        let mut run = run();
        run.report_predicate("temp", 1);
        run.enter("reviewing");
        assert!(!run.is_finished());
        assert!(run.facts().is_empty());

        run.enter("approved");
        assert!(run.is_finished());
        assert!(run.is_terminal());
    }

    #[test]
    fn snapshot_captures_merged_facts() {
        let mut run = run();
        run.report_predicate_in("quality_ok", true, FactScope::Run);
        let snapshot = run.snapshot();
        assert_eq!(snapshot.definition, "approval");
        assert_eq!(snapshot.state, "draft");
        assert_eq!(snapshot.facts.len(), 1);
    }
}

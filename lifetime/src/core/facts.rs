//! Scoped, deterministic fact cache owned by a single run.
//!
//! The store owns fact lifetime and lookup rules so the coordinator never has
//! to. It contains no transition logic and performs no evaluation.

use std::collections::BTreeMap;

use crate::core::types::{FactScope, FactValue};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactStore {
    /// Ephemeral facts, cleared on every transition.
    step: BTreeMap<String, FactValue>,
    /// Facts that persist for the lifetime of the run.
    run: BTreeMap<String, FactValue>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FactValue>,
        scope: FactScope,
    ) {
        let slot = match scope {
            FactScope::Step => &mut self.step,
            FactScope::Run => &mut self.run,
        };
        slot.insert(name.into(), value.into());
    }

    /// Resolve a fact by precedence: step scope first, then run scope.
    pub fn resolve(&self, name: &str) -> Option<&FactValue> {
        self.step.get(name).or_else(|| self.run.get(name))
    }

    pub fn clear_step(&mut self) {
        self.step.clear();
    }

    /// Merged view for inspection. Step facts override run facts.
    pub fn snapshot(&self) -> BTreeMap<String, FactValue> {
        let mut merged = self.run.clone();
        merged.extend(self.step.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn step_facts(&self) -> &BTreeMap<String, FactValue> {
        &self.step
    }

    pub fn run_facts(&self) -> &BTreeMap<String, FactValue> {
        &self.run
    }

    /// Number of distinct fact names visible through [`resolve`](Self::resolve).
    pub fn len(&self) -> usize {
        self.run.len() + self.step.keys().filter(|k| !self.run.contains_key(*k)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.step.is_empty() && self.run.is_empty()
    }
}

//! Stall diagnostics: why a given edge cannot fire.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::edge::Edge;
use crate::core::facts::FactStore;
use crate::core::types::FactValue;

/// Descriptor for why a transition was blocked. Generated on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionBlocker {
    pub edge: Edge,
    /// Required facts that have not been reported at all.
    pub missing: BTreeMap<String, FactValue>,
    /// Reported facts whose value differs: name -> (actual, required).
    pub mismatched: BTreeMap<String, (FactValue, FactValue)>,
}

impl TransitionBlocker {
    /// One-line human summary, stable across calls.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        for (name, required) in &self.missing {
            parts.push(format!("{name} missing (need {required})"));
        }
        for (name, (actual, required)) in &self.mismatched {
            parts.push(format!("{name}={actual} (need {required})"));
        }
        format!(
            "{} -> {}: {}",
            self.edge.source(),
            self.edge.target(),
            parts.join(", ")
        )
    }
}

/// Explain every edge in `edges` that is currently blocked.
///
/// Satisfied edges are omitted.
pub fn diagnose(edges: &[Edge], facts: &FactStore) -> Vec<TransitionBlocker> {
    edges
        .iter()
        .filter_map(|edge| blocker_for(edge, facts))
        .collect()
}

fn blocker_for(edge: &Edge, facts: &FactStore) -> Option<TransitionBlocker> {
    let mut missing = BTreeMap::new();
    let mut mismatched = BTreeMap::new();

    for (name, required) in edge.requires() {
        match facts.resolve(name) {
            None => {
                missing.insert(name.clone(), required.clone());
            }
            Some(actual) if actual != required => {
                mismatched.insert(name.clone(), (actual.clone(), required.clone()));
            }
            Some(_) => {}
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        return None;
    }

    Some(TransitionBlocker {
        edge: edge.clone(),
        missing,
        mismatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::definition::Definition;
    use crate::core::types::FactScope;

    fn gated() -> Definition {
        Definition::builder("gated")
            .states(["s", "t"])
            .initial("s")
            .transition("s", "t")
            .require("s", "t", "a", true)
            .require("s", "t", "b", false)
            .build()
            .expect("build")
    }

    #[test]
    fn partial_facts_report_missing_only() {
        let definition = gated();
        let mut facts = FactStore::new();
        facts.report("a", true, FactScope::Run);

        let blockers = diagnose(definition.transitions_from("s"), &facts);
        assert_eq!(blockers.len(), 1);
        let blocker = &blockers[0];
        assert_eq!(
            blocker.missing,
            BTreeMap::from([("b".to_string(), FactValue::Bool(false))])
        );
        assert!(blocker.mismatched.is_empty());
        assert_eq!(blocker.describe(), "s -> t: b missing (need false)");
    }

    #[test]
    fn wrong_values_report_actual_and_required() {
        let definition = gated();
        let mut facts = FactStore::new();
        facts.report("a", false, FactScope::Step);
        facts.report("b", false, FactScope::Step);

        let blockers = diagnose(definition.transitions_from("s"), &facts);
        assert_eq!(
            blockers[0].mismatched,
            BTreeMap::from([(
                "a".to_string(),
                (FactValue::Bool(false), FactValue::Bool(true))
            )])
        );
        assert!(blockers[0].missing.is_empty());
    }

    #[test]
    fn satisfied_edges_are_omitted() {
        let definition = gated();
        let mut facts = FactStore::new();
        facts.report("a", true, FactScope::Run);
        facts.report("b", false, FactScope::Run);
        assert!(diagnose(definition.transitions_from("s"), &facts).is_empty());
    }
}

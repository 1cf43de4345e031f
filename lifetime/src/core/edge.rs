//! Immutable transition descriptors.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::types::FactValue;

/// A directed, predicate-guarded move between two states.
///
/// `requires` is keyed by fact name; every entry must resolve to exactly the
/// stored value for the edge to be eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    priority: i64,
    source: String,
    target: String,
    requires: BTreeMap<String, FactValue>,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        priority: i64,
        requires: BTreeMap<String, FactValue>,
    ) -> Self {
        Self {
            priority,
            source: source.into(),
            target: target.into(),
            requires,
        }
    }

    /// Tie-break weight. Higher is preferred.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn requires(&self) -> &BTreeMap<String, FactValue> {
        &self.requires
    }

    pub fn is_unconditional(&self) -> bool {
        self.requires.is_empty()
    }
}

/// Sort edges into selection order: priority descending, then target ascending.
pub fn sort_for_selection(edges: &mut [Edge]) {
    edges.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.target.cmp(&b.target))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(target: &str, priority: i64) -> Edge {
        Edge::new("s", target, priority, BTreeMap::new())
    }

    #[test]
    fn sort_orders_by_priority_then_target() {
        let mut edges = vec![edge("b", 0), edge("c", 5), edge("a", 0), edge("d", 5)];
        sort_for_selection(&mut edges);
        let targets: Vec<&str> = edges.iter().map(Edge::target).collect();
        assert_eq!(targets, vec!["c", "d", "a", "b"]);
    }
}

//! Deterministic edge selection.

use crate::core::edge::Edge;
use crate::core::facts::FactStore;

/// True if every required fact resolves to exactly the required value.
pub fn is_satisfied(edge: &Edge, facts: &FactStore) -> bool {
    edge.requires()
        .iter()
        .all(|(name, required)| facts.resolve(name) == Some(required))
}

/// Find the first satisfied edge in compiled order.
///
/// Returns `None` if no edge can fire (the run is stalled).
pub fn first_satisfied<'a>(edges: &'a [Edge], facts: &FactStore) -> Option<&'a Edge> {
    edges.iter().find(|edge| is_satisfied(edge, facts))
}

//! Declarative lifetime definitions and their compiled edge tables.
//!
//! A [`Definition`] describes *which transitions are possible* and *which facts
//! must hold* for each to fire. It contains no execution logic. Definitions are
//! built once through [`DefinitionBuilder`] and never mutated afterwards, so a
//! single `Arc<Definition>` can back any number of runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::edge::{Edge, sort_for_selection};
use crate::core::invariants::validate_structure;
use crate::core::types::FactValue;
use crate::error::DefinitionError;

/// How structural problems are treated at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Reject definitions with any structural violation.
    #[default]
    Strict,
    /// Log violations at `warn` and build anyway.
    Permissive,
}

/// Immutable, compiled state graph.
#[derive(Debug, Clone)]
pub struct Definition {
    name: String,
    states: BTreeSet<String>,
    initial: String,
    terminal: BTreeSet<String>,
    transitions: BTreeMap<String, BTreeSet<String>>,
    compiled: BTreeMap<String, Vec<Edge>>,
}

impl Definition {
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder::new(name)
    }

    /// Human-readable identifier, used in logs and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn terminal(&self) -> &BTreeSet<String> {
        &self.terminal
    }

    /// Structural adjacency (source -> allowed targets) as declared.
    pub fn transitions(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.transitions
    }

    pub fn is_terminal(&self, state: &str) -> bool {
        self.terminal.contains(state)
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    /// Compiled edges leaving `state`, in selection order.
    ///
    /// Returns an empty slice when `state` has no outgoing edges.
    pub fn transitions_from(&self, state: &str) -> &[Edge] {
        self.compiled.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The compiled `source -> target` edge, with its requirements and priority.
    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.transitions_from(source)
            .iter()
            .find(|edge| edge.target() == target)
    }

    /// All compiled edges, grouped by source in lexical order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.compiled.values().flatten()
    }
}

/// Collects the raw graph description and compiles it into a [`Definition`].
#[derive(Debug, Clone, Default)]
pub struct DefinitionBuilder {
    pub(crate) name: String,
    pub(crate) states: BTreeSet<String>,
    pub(crate) initial: Option<String>,
    pub(crate) terminal: BTreeSet<String>,
    pub(crate) transitions: BTreeMap<String, BTreeSet<String>>,
    pub(crate) predicates: BTreeMap<(String, String), BTreeMap<String, FactValue>>,
    pub(crate) priorities: BTreeMap<(String, String), i64>,
}

impl DefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.states.insert(state.into());
        self
    }

    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    pub fn terminal<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminal.extend(states.into_iter().map(Into::into));
        self
    }

    /// Allow a move from `source` to `target`.
    pub fn transition(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.transitions
            .entry(source.into())
            .or_default()
            .insert(target.into());
        self
    }

    /// Require fact `name` to equal `value` for the `source -> target` edge.
    pub fn require(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<FactValue>,
    ) -> Self {
        self.predicates
            .entry((source.into(), target.into()))
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    /// Set the tie-break priority of the `source -> target` edge (default 0).
    pub fn priority(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        priority: i64,
    ) -> Self {
        self.priorities
            .insert((source.into(), target.into()), priority);
        self
    }

    /// Build with strict structural validation.
    pub fn build(self) -> Result<Definition, DefinitionError> {
        self.build_with(ValidationMode::Strict)
    }

    pub fn build_with(self, mode: ValidationMode) -> Result<Definition, DefinitionError> {
        let violations = validate_structure(&self);
        if !violations.is_empty() {
            match mode {
                ValidationMode::Strict => {
                    return Err(DefinitionError::Invalid {
                        name: self.name,
                        violations,
                    });
                }
                ValidationMode::Permissive => {
                    for violation in &violations {
                        warn!(definition = %self.name, %violation, "building definition with structural violation");
                    }
                }
            }
        }

        let compiled = compile(&self.transitions, &self.predicates, &self.priorities);
        debug!(
            definition = %self.name,
            states = self.states.len(),
            edges = compiled.values().map(Vec::len).sum::<usize>(),
            "compiled definition"
        );

        Ok(Definition {
            name: self.name,
            states: self.states,
            initial: self.initial.unwrap_or_default(),
            terminal: self.terminal,
            transitions: self.transitions,
            compiled,
        })
    }
}

fn compile(
    transitions: &BTreeMap<String, BTreeSet<String>>,
    predicates: &BTreeMap<(String, String), BTreeMap<String, FactValue>>,
    priorities: &BTreeMap<(String, String), i64>,
) -> BTreeMap<String, Vec<Edge>> {
    let mut compiled: BTreeMap<String, Vec<Edge>> = BTreeMap::new();

    for (source, targets) in transitions {
        for target in targets {
            let key = (source.clone(), target.clone());
            let requires = predicates.get(&key).cloned().unwrap_or_default();
            let priority = priorities.get(&key).copied().unwrap_or(0);
            compiled
                .entry(source.clone())
                .or_default()
                .push(Edge::new(source, target, priority, requires));
        }
    }

    for edges in compiled.values_mut() {
        sort_for_selection(edges);
    }

    compiled
}

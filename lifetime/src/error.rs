//! Error types surfaced to callers of the engine.
//!
//! Stepping never fails: a run with no eligible edge is reported as
//! [`StepResult::Stalled`](crate::StepResult::Stalled), not as an error.

use thiserror::Error;

/// Caller errors raised while reporting facts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A fact scope decoded from outside the type system was not recognized.
    #[error("unknown predicate scope: {0}")]
    InvalidScope(String),
}

/// Structural problems found while building a [`Definition`](crate::Definition).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// One stable message per violation, in deterministic order.
    #[error("invalid definition '{name}':\n- {}", .violations.join("\n- "))]
    Invalid {
        name: String,
        violations: Vec<String>,
    },
}

impl DefinitionError {
    pub fn violations(&self) -> &[String] {
        match self {
            DefinitionError::Invalid { violations, .. } => violations,
        }
    }
}

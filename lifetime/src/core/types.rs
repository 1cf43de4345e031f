//! Shared deterministic types for engine core logic.
//!
//! These types define stable contracts between core components. They must not
//! depend on external state or I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Value of a reported fact.
///
/// Values are never interpreted, only compared for equality. Kinds never
/// coerce: `Text("on")` and `Symbol("on")` are different values, as are
/// `Bool(true)` and `Int(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FactValue {
    Text(String),
    Bool(bool),
    Int(i64),
    /// Enumerated value identified by name (e.g. a domain status).
    Symbol(String),
}

impl FactValue {
    pub fn symbol(name: impl Into<String>) -> Self {
        FactValue::Symbol(name.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FactValue::Text(_) => "text",
            FactValue::Bool(_) => "bool",
            FactValue::Int(_) => "int",
            FactValue::Symbol(_) => "symbol",
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Text(text) => write!(f, "{text:?}"),
            FactValue::Bool(value) => write!(f, "{value}"),
            FactValue::Int(value) => write!(f, "{value}"),
            FactValue::Symbol(name) => write!(f, ":{name}"),
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Int(value)
    }
}

impl From<i32> for FactValue {
    fn from(value: i32) -> Self {
        FactValue::Int(i64::from(value))
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

/// Lifetime of a reported fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactScope {
    /// Ephemeral: cleared whenever the run takes a transition.
    #[default]
    Step,
    /// Persistent for the lifetime of the run.
    Run,
}

impl FactScope {
    pub fn as_str(self) -> &'static str {
        match self {
            FactScope::Step => "step",
            FactScope::Run => "run",
        }
    }
}

impl fmt::Display for FactScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactScope {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "step" => Ok(FactScope::Step),
            "run" => Ok(FactScope::Run),
            _ => Err(EngineError::InvalidScope(raw.to_string())),
        }
    }
}

/// Wire codes used by external callers that encode scopes as bit flags.
impl TryFrom<u8> for FactScope {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x1 => Ok(FactScope::Step),
            0x2 => Ok(FactScope::Run),
            other => Err(EngineError::InvalidScope(format!("{other:#x}"))),
        }
    }
}

/// Outcome of a single `step` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepResult {
    /// A transition was applied.
    Advanced,
    /// No outgoing edge is currently satisfied. Not an error.
    Stalled,
    /// The run is finished; repeated steps keep returning this.
    Finished,
}

impl StepResult {
    pub fn as_str(self) -> &'static str {
        match self {
            StepResult::Advanced => "advanced",
            StepResult::Stalled => "stalled",
            StepResult::Finished => "finished",
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_values_never_coerce_across_kinds() {
        assert_ne!(FactValue::from(true), FactValue::from(1));
        assert_ne!(FactValue::from("on"), FactValue::symbol("on"));
        assert_eq!(FactValue::from(7), FactValue::Int(7));
    }

    #[test]
    fn scope_parses_known_names_only() {
        assert_eq!("step".parse::<FactScope>(), Ok(FactScope::Step));
        assert_eq!(" RUN ".parse::<FactScope>(), Ok(FactScope::Run));
        assert_eq!(
            "session".parse::<FactScope>(),
            Err(EngineError::InvalidScope("session".to_string()))
        );
    }

    #[test]
    fn scope_codes_match_flag_values() {
        assert_eq!(FactScope::try_from(0x1), Ok(FactScope::Step));
        assert_eq!(FactScope::try_from(0x2), Ok(FactScope::Run));
        let err = FactScope::try_from(0x4).expect_err("expected invalid scope");
        assert_eq!(err.to_string(), "unknown predicate scope: 0x4");
    }

    #[test]
    fn fact_value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&FactValue::symbol("urgent")).expect("serialize");
        assert_eq!(json, r#"{"kind":"symbol","value":"urgent"}"#);
    }
}

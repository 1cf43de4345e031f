//! Declarative, predicate-gated state-transition coordinator.
//!
//! Callers describe a finite graph of named states and allowed edges. Each edge
//! may require that externally reported facts hold specific values. The
//! [`Coordinator`] advances independent [`Run`]s of that graph one step at a
//! time and reports whether a run advanced, stalled, or finished.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (definition compilation, fact
//!   resolution, edge selection, stall diagnostics). No I/O.
//! - **[`io`]**: Side-effecting helpers (config files, JSON event logs).
//!
//! Orchestration lives in [`coordinator`], which drives [`run`] instances and
//! reports every step through an injected [`notify::Notifier`].

pub mod coordinator;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod notify;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::coordinator::{Coordinator, Sweep};
pub use crate::core::blocker::TransitionBlocker;
pub use crate::core::definition::{Definition, DefinitionBuilder, ValidationMode};
pub use crate::core::edge::Edge;
pub use crate::core::facts::FactStore;
pub use crate::core::types::{FactScope, FactValue, StepResult};
pub use crate::error::{DefinitionError, EngineError};
pub use crate::notify::{Event, EventKind, Notifier, NullNotifier, TracingNotifier};
pub use crate::run::{Run, RunId, RunSnapshot};

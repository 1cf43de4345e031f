//! Notification boundary between the coordinator and the outside world.
//!
//! The coordinator emits exactly four event kinds through an injected
//! [`Notifier`], synchronously, before the emitting call returns. Transports
//! (buses, channels, sockets) are collaborators that implement this trait.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::run::Run;

/// Stable event kind names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    #[serde(rename = "engine.step.started")]
    StepStarted,
    #[serde(rename = "engine.lifetime.state.advanced")]
    LifetimeAdvanced,
    #[serde(rename = "engine.lifetime.state.finished")]
    LifetimeFinished,
    #[serde(rename = "engine.stalled")]
    EngineStalled,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::StepStarted => "engine.step.started",
            EventKind::LifetimeAdvanced => "engine.lifetime.state.advanced",
            EventKind::LifetimeFinished => "engine.lifetime.state.finished",
            EventKind::EngineStalled => "engine.stalled",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event together with its payload.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A `step` call began. No payload.
    StepStarted,
    /// A transition was applied to `run`.
    LifetimeAdvanced { run: &'a Run },
    /// `run` is finished. `terminated` is true only the first time.
    LifetimeFinished { run: &'a Run, terminated: bool },
    /// No eligible edge was found for `run` this step.
    EngineStalled { run: &'a Run },
}

impl<'a> Event<'a> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StepStarted => EventKind::StepStarted,
            Event::LifetimeAdvanced { .. } => EventKind::LifetimeAdvanced,
            Event::LifetimeFinished { .. } => EventKind::LifetimeFinished,
            Event::EngineStalled { .. } => EventKind::EngineStalled,
        }
    }

    pub fn run(&self) -> Option<&'a Run> {
        match *self {
            Event::StepStarted => None,
            Event::LifetimeAdvanced { run }
            | Event::LifetimeFinished { run, .. }
            | Event::EngineStalled { run } => Some(run),
        }
    }
}

/// Receives coordinator events.
///
/// Implementations must not fail the emitting call; anything that can go
/// wrong inside a notifier is handled (or logged) inside it.
pub trait Notifier {
    fn emit(&self, event: &Event<'_>);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn emit(&self, event: &Event<'_>) {
        (**self).emit(event);
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn emit(&self, event: &Event<'_>) {
        (**self).emit(event);
    }
}

/// Fan-out: delivers each event to `A`, then `B`.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn emit(&self, event: &Event<'_>) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn emit(&self, _event: &Event<'_>) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn emit(&self, event: &Event<'_>) {
        let kind = event.kind();
        match *event {
            Event::StepStarted => debug!(event = %kind, "step started"),
            Event::LifetimeAdvanced { run } => debug!(
                event = %kind,
                run_id = %run.id(),
                definition = run.definition().name(),
                state = run.state(),
                "lifetime advanced"
            ),
            Event::LifetimeFinished { run, terminated } => info!(
                event = %kind,
                run_id = %run.id(),
                definition = run.definition().name(),
                state = run.state(),
                terminated,
                "lifetime finished"
            ),
            Event::EngineStalled { run } => warn!(
                event = %kind,
                run_id = %run.id(),
                definition = run.definition().name(),
                state = run.state(),
                "engine stalled"
            ),
        }
    }
}

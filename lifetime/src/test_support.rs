//! Test-only helpers: fixture definitions and a recording notifier.

use std::cell::RefCell;

use crate::core::definition::Definition;
use crate::notify::{Event, EventKind, Notifier};
use crate::run::RunSnapshot;

/// Document approval lifetime:
///
/// ```text
/// draft -> reviewing                      (unconditional)
/// reviewing -> approved                   (quality_ok=true, review_ok=true)
/// reviewing -> rejected                   (review_ok=false)
/// ```
pub fn approval_definition() -> Definition {
    Definition::builder("approval")
        .states(["draft", "reviewing", "approved", "rejected"])
        .initial("draft")
        .terminal(["approved", "rejected"])
        .transition("draft", "reviewing")
        .transition("reviewing", "approved")
        .transition("reviewing", "rejected")
        .require("reviewing", "approved", "quality_ok", true)
        .require("reviewing", "approved", "review_ok", true)
        .require("reviewing", "rejected", "review_ok", false)
        .build()
        .expect("approval definition is valid")
}

/// Owned copy of an emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub kind: EventKind,
    pub run: Option<RunSnapshot>,
    pub terminated: Option<bool>,
}

/// Notifier that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: RefCell<Vec<RecordedEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(|event| event.kind).collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn emit(&self, event: &Event<'_>) {
        let terminated = match event {
            Event::LifetimeFinished { terminated, .. } => Some(*terminated),
            _ => None,
        };
        self.events.borrow_mut().push(RecordedEvent {
            kind: event.kind(),
            run: event.run().map(|run| run.snapshot()),
            terminated,
        });
    }
}

//! Orchestration: owns active runs and advances them one step at a time.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::core::blocker::{TransitionBlocker, diagnose};
use crate::core::definition::Definition;
use crate::core::selector::first_satisfied;
use crate::core::types::StepResult;
use crate::notify::{Event, Notifier};
use crate::run::{Run, RunId};

/// Owns the active-run collection and drives stepping.
///
/// Construct one per application (or per test) and pass it by reference;
/// independent coordinators never share state. Access is single-threaded:
/// callers sharing a coordinator across threads wrap it in a lock.
#[derive(Debug)]
pub struct Coordinator<N: Notifier> {
    notifier: N,
    runs: HashMap<RunId, Run>,
    /// Active ids in start order; drives `all_runs` and `step_all` ordering.
    order: Vec<RunId>,
}

/// Result of a [`Coordinator::step_all`] pass.
#[derive(Debug, Default)]
pub struct Sweep {
    /// Per-run results, in the order the runs were captured.
    pub results: Vec<(RunId, StepResult)>,
    /// Runs removed from the active set because they finished.
    pub finished: Vec<Run>,
}

impl Sweep {
    pub fn result(&self, id: RunId) -> Option<StepResult> {
        self.results
            .iter()
            .find(|(run_id, _)| *run_id == id)
            .map(|(_, result)| *result)
    }

    pub fn count(&self, result: StepResult) -> usize {
        self.results.iter().filter(|(_, r)| *r == result).count()
    }
}

impl<N: Notifier> Coordinator<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            runs: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Create a run at the definition's initial state and register it.
    ///
    /// Does not emit a notification.
    pub fn start(&mut self, definition: Arc<Definition>) -> &mut Run {
        let mut id = RunId::random();
        while self.runs.contains_key(&id) {
            id = RunId::random();
        }

        debug!(
            run_id = %id,
            definition = definition.name(),
            initial = definition.initial(),
            "starting run"
        );
        self.order.push(id);
        self.runs.entry(id).or_insert(Run::new(id, definition))
    }

    pub fn get(&self, id: RunId) -> Option<&Run> {
        self.runs.get(&id)
    }

    pub fn get_mut(&mut self, id: RunId) -> Option<&mut Run> {
        self.runs.get_mut(&id)
    }

    /// Active runs in start order.
    pub fn all_runs(&self) -> impl Iterator<Item = &Run> {
        self.order.iter().filter_map(|id| self.runs.get(id))
    }

    pub fn run_ids(&self) -> &[RunId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Drop a run from the active set, handing ownership back to the caller.
    pub fn remove(&mut self, id: RunId) -> Option<Run> {
        let run = self.runs.remove(&id)?;
        self.order.retain(|active| *active != id);
        debug!(run_id = %id, state = run.state(), "run removed");
        Some(run)
    }

    /// Step a registered run. Returns `None` if `id` is not active.
    pub fn step(&mut self, id: RunId) -> Option<StepResult> {
        let run = self.runs.get_mut(&id)?;
        Some(advance(&self.notifier, run))
    }

    /// Step a run the caller holds directly (e.g. one already removed).
    pub fn step_run(&self, run: &mut Run) -> StepResult {
        advance(&self.notifier, run)
    }

    /// Step every active run exactly once.
    ///
    /// The set of runs is captured before the first step. Finished runs are
    /// removed from the active set and returned in [`Sweep::finished`].
    pub fn step_all(&mut self) -> Sweep {
        let snapshot = self.order.clone();
        let mut sweep = Sweep::default();

        for id in snapshot {
            let Some(run) = self.runs.get_mut(&id) else {
                continue;
            };
            let result = advance(&self.notifier, run);
            sweep.results.push((id, result));

            if result == StepResult::Finished {
                sweep.finished.extend(self.remove(id));
            }
        }

        debug!(
            stepped = sweep.results.len(),
            finished = sweep.finished.len(),
            remaining = self.runs.len(),
            "step_all complete"
        );
        sweep
    }

    /// Explain why no transition can be taken from the run's current state.
    ///
    /// Returns one entry per outgoing edge that has at least one missing or
    /// mismatched fact. Pure: emits nothing and mutates nothing.
    pub fn why_stalled(&self, run: &Run) -> Vec<TransitionBlocker> {
        diagnose(run.definition().transitions_from(run.state()), run.facts())
    }
}

fn advance<N: Notifier>(notifier: &N, run: &mut Run) -> StepResult {
    notifier.emit(&Event::StepStarted);

    if run.is_finished() {
        notifier.emit(&Event::LifetimeFinished {
            run: &*run,
            terminated: false,
        });
        return StepResult::Finished;
    }

    if run.is_terminal() {
        run.mark_finished();
        debug!(run_id = %run.id(), state = run.state(), "run finished");
        notifier.emit(&Event::LifetimeFinished {
            run: &*run,
            terminated: true,
        });
        return StepResult::Finished;
    }

    let definition = Arc::clone(run.definition());
    if let Some(edge) = first_satisfied(definition.transitions_from(run.state()), run.facts()) {
        debug!(
            run_id = %run.id(),
            from = edge.source(),
            to = edge.target(),
            priority = edge.priority(),
            "applying transition"
        );
        run.enter(edge.target());
        notifier.emit(&Event::LifetimeAdvanced { run: &*run });
        return StepResult::Advanced;
    }

    debug!(run_id = %run.id(), state = run.state(), "no eligible transition");
    notifier.emit(&Event::EngineStalled { run: &*run });
    StepResult::Stalled
}

//! Lifecycle tests for the document approval workflow.
//!
//! These tests drive the public API the way domain code does: build a
//! definition, start runs, report facts, step, and inspect state or stall
//! diagnostics.

use std::collections::BTreeMap;
use std::sync::Arc;

use lifetime::io::config::{DefinitionsConfig, EngineConfig};
use lifetime::test_support::{RecordingNotifier, approval_definition};
use lifetime::{
    Coordinator, Definition, EventKind, FactScope, FactValue, StepResult, ValidationMode,
};

/// Approval path: draft → reviewing → stalled → approved.
///
/// Execution sequence:
/// 1. Start: state `draft`, not finished.
/// 2. Step: unconditional edge → `reviewing`.
/// 3. Step without facts: stalled, both outgoing edges blocked.
/// 4. Report `quality_ok=true`, `review_ok=true` (run scope); step → `approved`
///    and the run is finished.
/// 5. Step again: finished, no mutation.
#[test]
fn approval_path_reaches_approved() {
    let recorder = RecordingNotifier::default();
    let mut coordinator = Coordinator::new(&recorder);
    let definition = Arc::new(approval_definition());

    let run = coordinator.start(Arc::clone(&definition));
    assert_eq!(run.state(), definition.initial());
    assert!(!run.is_finished());
    let id = run.id();

    assert_eq!(coordinator.step(id), Some(StepResult::Advanced));
    assert_eq!(coordinator.get(id).expect("run").state(), "reviewing");

    assert_eq!(coordinator.step(id), Some(StepResult::Stalled));
    let run = coordinator.get(id).expect("run");
    assert_eq!(run.state(), "reviewing");
    let blockers = coordinator.why_stalled(run);
    assert_eq!(blockers.len(), 2);
    assert_eq!(blockers[0].edge.target(), "approved");
    assert_eq!(blockers[0].missing.len(), 2);
    assert_eq!(blockers[1].edge.target(), "rejected");

    let run = coordinator.get_mut(id).expect("run");
    run.report_predicate_in("quality_ok", true, FactScope::Run);
    run.report_predicate_in("review_ok", true, FactScope::Run);

    assert_eq!(coordinator.step(id), Some(StepResult::Advanced));
    let run = coordinator.get(id).expect("run");
    assert_eq!(run.state(), "approved");
    assert!(run.is_finished());
    assert!(coordinator.why_stalled(run).is_empty());

    assert_eq!(coordinator.step(id), Some(StepResult::Finished));
    assert_eq!(coordinator.get(id).expect("run").state(), "approved");

    assert_eq!(
        recorder.kinds(),
        vec![
            EventKind::StepStarted,
            EventKind::LifetimeAdvanced,
            EventKind::StepStarted,
            EventKind::EngineStalled,
            EventKind::StepStarted,
            EventKind::LifetimeAdvanced,
            EventKind::StepStarted,
            EventKind::LifetimeFinished,
        ]
    );
}

/// Rejection path: only `review_ok=false` is reported while reviewing.
#[test]
fn rejection_path_reaches_rejected() {
    let mut coordinator = Coordinator::new(RecordingNotifier::default());
    let id = coordinator.start(Arc::new(approval_definition())).id();
    assert_eq!(coordinator.step(id), Some(StepResult::Advanced));

    coordinator
        .get_mut(id)
        .expect("run")
        .report_predicate_in("review_ok", false, FactScope::Run);

    assert_eq!(coordinator.step(id), Some(StepResult::Advanced));
    let run = coordinator.get(id).expect("run");
    assert_eq!(run.state(), "rejected");
    assert!(run.is_finished());

    let sweep = coordinator.step_all();
    assert_eq!(sweep.result(id), Some(StepResult::Finished));
    assert_eq!(sweep.finished[0].state(), "rejected");
    assert!(coordinator.is_empty());
}

/// Step-scoped facts are dropped on transition; run-scoped facts survive.
///
/// `review_ok=true` reported at step scope while in `draft` is cleared when the
/// run moves to `reviewing`, so only the run-scoped `quality_ok` remains.
#[test]
fn step_scoped_facts_do_not_leak_across_transitions() {
    let mut coordinator = Coordinator::new(RecordingNotifier::default());
    let run = coordinator.start(Arc::new(approval_definition()));
    run.report_predicate_in("quality_ok", true, FactScope::Run);
    run.report_predicate("review_ok", true);
    let id = run.id();

    assert_eq!(coordinator.step(id), Some(StepResult::Advanced));
    assert_eq!(coordinator.step(id), Some(StepResult::Stalled));

    let run = coordinator.get(id).expect("run");
    let blockers = coordinator.why_stalled(run);
    assert_eq!(
        blockers[0].missing,
        BTreeMap::from([("review_ok".to_string(), FactValue::Bool(true))])
    );
    assert!(blockers[0].mismatched.is_empty());
}

/// Conflicting reports: the step value shadows the run value for this step only.
#[test]
fn step_value_shadows_run_value() {
    let mut coordinator = Coordinator::new(RecordingNotifier::default());
    let id = coordinator.start(Arc::new(approval_definition())).id();
    coordinator.step(id);

    let run = coordinator.get_mut(id).expect("run");
    run.report_predicate_in("review_ok", true, FactScope::Run);
    run.report_predicate("review_ok", false);

    assert_eq!(coordinator.step(id), Some(StepResult::Advanced));
    assert_eq!(coordinator.get(id).expect("run").state(), "rejected");
}

/// Several independent runs over one shared definition, stepped in bulk.
#[test]
fn step_all_drives_independent_runs() {
    let mut coordinator = Coordinator::new(RecordingNotifier::default());
    let definition = Arc::new(approval_definition());

    let approve = coordinator.start(Arc::clone(&definition)).id();
    let reject = coordinator.start(Arc::clone(&definition)).id();
    let idle = coordinator.start(Arc::clone(&definition)).id();

    for (id, review_ok) in [(approve, true), (reject, false)] {
        let run = coordinator.get_mut(id).expect("run");
        run.report_predicate_in("quality_ok", true, FactScope::Run);
        run.report_predicate_in("review_ok", review_ok, FactScope::Run);
    }

    let first = coordinator.step_all();
    assert_eq!(first.count(StepResult::Advanced), 3);

    let second = coordinator.step_all();
    assert_eq!(second.result(approve), Some(StepResult::Advanced));
    assert_eq!(second.result(reject), Some(StepResult::Advanced));
    assert_eq!(second.result(idle), Some(StepResult::Stalled));
    assert!(second.finished.is_empty());

    let third = coordinator.step_all();
    let mut finished: Vec<&str> = third.finished.iter().map(|run| run.state()).collect();
    finished.sort_unstable();
    assert_eq!(finished, vec!["approved", "rejected"]);
    assert_eq!(
        coordinator.all_runs().map(|run| run.id()).collect::<Vec<_>>(),
        vec![idle]
    );
}

/// Config-selected validation mode decides whether broken definitions build.
#[test]
fn validation_mode_comes_from_config() {
    let broken = || {
        Definition::builder("broken")
            .states(["a"])
            .initial("a")
            .terminal(["z"])
    };

    let strict = EngineConfig::default();
    assert!(
        broken()
            .build_with(strict.definitions.validation)
            .is_err()
    );

    let permissive = EngineConfig {
        definitions: DefinitionsConfig {
            validation: ValidationMode::Permissive,
        },
        ..EngineConfig::default()
    };
    let definition = broken()
        .build_with(permissive.definitions.validation)
        .expect("permissive build");
    assert!(definition.is_terminal("z"));
}

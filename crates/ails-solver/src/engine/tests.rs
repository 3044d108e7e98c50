//! Tests for the search engine.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ails_config::{PerturbationKind, SearchConfig, SelectionConfig};
use ails_core::{AilsError, Solution};

use super::*;
use crate::clock::ManualClock;
use crate::sink::{RecordedEvent, RecordingSink, SinkError};
use crate::perturbation::{ConcentricRemoval, PerturbationRegistry, SequentialRemoval};
use crate::test_utils::{
    frozen_builder, grid, ten_customer_scenario, tight, BoundedOmega, NoLocalSearch, NoRepair,
    RejectAll, SingleRouteConstruction,
};

fn scenario_config(seed: u64, iterations: u64) -> SearchConfig {
    SearchConfig::new()
        .with_random_seed(seed)
        .with_iteration_limit(iterations)
        .with_epsilon(1e-6)
}

#[derive(Debug)]
struct BrokenSink;

impl ResultSink for BrokenSink {
    fn on_initial(&mut self, _: &Solution, _: f64, _: f64) -> std::result::Result<(), SinkError> {
        Err(SinkError::Other("initial".into()))
    }

    fn on_new_best(
        &mut self,
        _: u64,
        _: f64,
        _: f64,
        _: &Solution,
    ) -> std::result::Result<(), SinkError> {
        Err(SinkError::Other("new best".into()))
    }

    fn on_finished(&mut self, _: &Solution, _: f64, _: f64) -> std::result::Result<(), SinkError> {
        Err(SinkError::Other("finished".into()))
    }
}

#[test]
fn test_runs_exactly_the_iteration_limit() {
    let mut engine = frozen_builder(ten_customer_scenario(), scenario_config(7, 25))
        .build()
        .unwrap();
    assert_eq!(engine.state(), EngineState::Created);

    let outcome = engine.run().unwrap();
    assert_eq!(outcome.metrics.iterations, 25);
    assert_eq!(engine.iteration(), 25);
    assert_eq!(engine.state(), EngineState::Stopped);
    assert!(outcome.best.is_complete(engine.instance()));
    assert!(outcome.best.is_feasible(engine.instance()));
    assert_eq!(outcome.best_f, engine.best_f());
}

#[test]
fn test_same_seed_same_run() {
    let run = || {
        let sink = RecordingSink::new();
        let mut engine = frozen_builder(ten_customer_scenario(), scenario_config(42, 200))
            .with_sink(sink.clone())
            .build()
            .unwrap();
        let outcome = engine.run().unwrap();
        (outcome, sink.new_best_count())
    };
    let (a, a_events) = run();
    let (b, b_events) = run();

    assert_eq!(format!("{:.4}", a.best_f), format!("{:.4}", b.best_f));
    assert_eq!(a.best, b.best);
    assert_eq!(a.metrics.iterations, b.metrics.iterations);
    assert_eq!(a.metrics.iteration_of_best, b.metrics.iteration_of_best);
    assert_eq!(a_events, b_events);
}

#[test]
fn test_best_cost_strictly_decreases() {
    let sink = RecordingSink::new();
    let epsilon = 1e-6;
    let mut engine = frozen_builder(grid(5, 1, 8), scenario_config(3, 150))
        .with_sink(sink.clone())
        .build()
        .unwrap();
    let outcome = engine.run().unwrap();

    let events = sink.events();
    let initial = match events.first() {
        Some(RecordedEvent::Initial { cost, .. }) => *cost,
        other => panic!("expected initial event, got {other:?}"),
    };
    let mut last = initial;
    for cost in sink.best_costs() {
        assert!(cost < last - epsilon);
        last = cost;
    }
    assert_eq!(last, outcome.best_f);
    assert_eq!(
        events.last(),
        Some(&RecordedEvent::Finished {
            cost: outcome.best_f,
            total_time: outcome.metrics.total_time
        })
    );
    assert_eq!(outcome.improvements as usize, sink.new_best_count());
}

#[test]
fn test_forced_iterations_replace_the_reference() {
    let config = scenario_config(11, 30)
        .with_perturbations(vec![
            PerturbationKind::Sequential,
            PerturbationKind::Concentric,
            PerturbationKind::Decomposition,
        ])
        .with_selection(SelectionConfig::PeriodicForced {
            operator: PerturbationKind::Decomposition,
            period: 5,
        });
    let mut engine = frozen_builder(ten_customer_scenario(), config)
        .with_acceptance(RejectAll)
        .build()
        .unwrap();
    engine.initialize().unwrap();

    while !engine.is_terminated() {
        let before = engine.reference_solution().clone();
        let report = engine.step().unwrap();
        if report.iteration % 5 == 0 {
            assert!(report.forced);
            assert!(report.accepted);
            assert_eq!(report.operator, PerturbationKind::Decomposition);
            assert_eq!(report.omega, None);
            assert_eq!(engine.reference_solution(), engine.working_solution());
        } else {
            assert!(!report.forced);
            assert!(!report.accepted);
            assert_ne!(report.operator, PerturbationKind::Decomposition);
            assert_eq!(engine.reference_solution(), &before);
        }
    }
    assert_eq!(engine.finish().unwrap().metrics.iterations, 30);
}

#[test]
fn test_omega_stays_within_bounds() {
    let config = scenario_config(5, 120).with_gamma(5);
    let mut engine = frozen_builder(grid(5, 1, 8), config).build().unwrap();
    engine.run().unwrap();

    let (min, max) = engine.diversity().bounds();
    assert_eq!((min, max), (1.0, 23.0));
    let snapshot = engine.omega_snapshot();
    assert!(!snapshot.is_empty());
    for (key, omega) in snapshot {
        assert!((min..=max).contains(&omega), "{key}: {omega}");
    }
    assert!(engine.diversity().rounds() > 0);
}

#[test]
fn test_operators_keep_their_own_omega_bounds() {
    let mut registry = PerturbationRegistry::new();
    registry
        .register(PerturbationKind::Sequential, |s| {
            Box::new(BoundedOmega {
                inner: SequentialRemoval::new(s.insertion.clone()),
                bounds: (1.0, 2.0),
            })
        })
        .register(PerturbationKind::Concentric, |s| {
            Box::new(BoundedOmega {
                inner: ConcentricRemoval::new(s.insertion.clone()),
                bounds: (3.0, 5.0),
            })
        });

    let config = scenario_config(5, 120).with_gamma(5);
    let mut engine = frozen_builder(grid(5, 1, 8), config)
        .with_registry(registry)
        .build()
        .unwrap();
    engine.run().unwrap();

    assert_eq!(engine.diversity().bounds(), (1.0, 23.0));
    let snapshot = engine.omega_snapshot();
    for kind in [PerturbationKind::Sequential, PerturbationKind::Concentric] {
        assert!(snapshot.iter().any(|(key, _)| key.kind == kind), "{kind} never ran");
    }
    for (key, omega) in snapshot {
        let expected = match key.kind {
            PerturbationKind::Sequential => (1.0, 2.0),
            _ => (3.0, 5.0),
        };
        let state = engine.diversity().state(key).unwrap();
        assert_eq!(state.bounds(), expected);
        assert!((expected.0..=expected.1).contains(&omega), "{key}: {omega}");
    }
}

#[test]
fn test_operator_without_omega_gets_no_feedback() {
    let config = scenario_config(2, 10)
        .with_perturbations(vec![PerturbationKind::Sequential, PerturbationKind::Decomposition])
        .with_selection(SelectionConfig::FixedIndex { index: 1 });
    let mut engine = frozen_builder(ten_customer_scenario(), config).build().unwrap();
    engine.initialize().unwrap();
    for _ in 0..10 {
        let report = engine.step().unwrap();
        assert_eq!(report.operator, PerturbationKind::Decomposition);
        assert_eq!(report.omega, None);
    }
    assert!(engine.omega_snapshot().is_empty());
}

#[test]
fn test_calls_out_of_order_are_rejected() {
    let mut engine = frozen_builder(ten_customer_scenario(), scenario_config(1, 3))
        .build()
        .unwrap();
    assert!(matches!(engine.step(), Err(AilsError::InvalidState(_))));
    assert!(matches!(engine.finish(), Err(AilsError::InvalidState(_))));

    engine.run().unwrap();
    assert!(matches!(engine.initialize(), Err(AilsError::InvalidState(_))));
    assert!(matches!(engine.run(), Err(AilsError::InvalidState(_))));
    assert!(matches!(engine.step(), Err(AilsError::InvalidState(_))));
}

#[test]
fn test_infeasible_start_fails_fast() {
    let mut engine = frozen_builder(tight(6, 2), scenario_config(1, 10))
        .with_construction(SingleRouteConstruction)
        .with_repair(NoRepair)
        .with_local_search(NoLocalSearch)
        .build()
        .unwrap();
    let err = engine.run().unwrap_err();
    assert!(matches!(err, AilsError::Config(_)));
    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(engine.iteration(), 0);
}

#[test]
fn test_known_optimum_stops_before_iterating() {
    let config = scenario_config(1, 100).with_optimal(1e9);
    let mut engine = frozen_builder(ten_customer_scenario(), config).build().unwrap();
    let outcome = engine.run().unwrap();

    assert_eq!(outcome.metrics.iterations, 0);
    assert_eq!(outcome.metrics.time_per_iteration(), None);
    assert_eq!(outcome.metrics.convergence_iteration(), None);
    assert!(outcome.gap.unwrap() < 0.0);
}

#[test]
fn test_sink_failures_do_not_stop_the_search() {
    let mut engine = frozen_builder(ten_customer_scenario(), scenario_config(4, 40))
        .with_sink(BrokenSink)
        .build()
        .unwrap();
    let outcome = engine.run().unwrap();
    assert_eq!(outcome.metrics.iterations, 40);
}

#[test]
fn test_time_limit_with_ticking_clock() {
    let config = SearchConfig::new().with_random_seed(9).with_time_limit(0.2);
    let mut engine = SearchEngineBuilder::new(ten_customer_scenario(), config)
        .with_clock(ManualClock::new(Duration::from_millis(5)))
        .build()
        .unwrap();
    let outcome = engine.run().unwrap();

    assert!(outcome.metrics.iterations > 0);
    assert!(outcome.metrics.total_time > 0.2);
    assert!(outcome.metrics.time_of_best <= outcome.metrics.total_time);
}

#[test]
fn test_invalid_config_is_rejected_at_build() {
    let config = SearchConfig::new().with_gamma(0);
    let err = frozen_builder(ten_customer_scenario(), config).build().unwrap_err();
    assert!(matches!(err, AilsError::Config(_)));

    let config = SearchConfig::new().with_selection(SelectionConfig::FixedIndex { index: 9 });
    let err = frozen_builder(ten_customer_scenario(), config).build().unwrap_err();
    assert!(matches!(err, AilsError::Config(_)));

    let config = SearchConfig::new().with_time_limit(f64::INFINITY);
    let err = frozen_builder(ten_customer_scenario(), config).build().unwrap_err();
    assert!(matches!(err, AilsError::Config(_)));
}

#[test]
fn test_huge_time_limit_builds() {
    let config = scenario_config(3, 1).with_time_limit(1e20);
    let mut engine = frozen_builder(ten_customer_scenario(), config).build().unwrap();
    engine.initialize().unwrap();
    assert!(!engine.is_terminated());
}

#[test]
fn test_state_display() {
    assert_eq!(EngineState::LocalSearching.to_string(), "local_searching");
    assert_eq!(EngineState::Iterating.as_str(), "iterating");
}

#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_state_transitions_are_logged() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let mut engine = frozen_builder(ten_customer_scenario(), scenario_config(1, 2))
            .build()
            .unwrap();
        engine.run().unwrap();
    });

    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    for (from, to) in [
        ("created", "constructing"),
        ("constructing", "repairing"),
        ("repairing", "local_searching"),
        ("local_searching", "iterating"),
        ("iterating", "stopped"),
    ] {
        assert!(logs.contains(&format!("from={from} to={to}")), "{from} -> {to} missing");
    }
}

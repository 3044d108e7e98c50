//! End-to-end searches through the facade.

use std::fs;

use ails::prelude::*;
use ails::{
    CompositeSink, ConvergenceCsvSink, ManualClock, RecordedEvent, RecordingSink,
    SolutionFileSink,
};
use ails_test::instances::{grid, ten_customer_scenario};

const TOY_VRP: &str = "\
NAME : toy-6
TYPE : CVRP
DIMENSION : 7
EDGE_WEIGHT_TYPE : EUC_2D
CAPACITY : 30
NODE_COORD_SECTION
1 0 0
2 10 0
3 10 10
4 0 10
5 -10 0
6 -10 -10
7 0 -10
DEMAND_SECTION
1 0
2 10
3 10
4 10
5 10
6 10
7 10
DEPOT_SECTION
1
-1
EOF
";

fn scenario(seed: u64) -> SearchConfig {
    SearchConfig::new()
        .with_random_seed(seed)
        .with_iteration_limit(200)
        .with_epsilon(1e-6)
}

fn run_scenario(seed: u64) -> (SearchOutcome, Vec<RecordedEvent>) {
    let sink = RecordingSink::new();
    let mut engine = SearchEngineBuilder::new(ten_customer_scenario(), scenario(seed))
        .with_clock(ManualClock::frozen())
        .with_sink(sink.clone())
        .build()
        .unwrap();
    let outcome = engine.run().unwrap();
    (outcome, sink.events())
}

#[test]
fn ten_customer_scenario_is_reproducible() {
    let (first, first_events) = run_scenario(42);
    let (second, second_events) = run_scenario(42);

    assert_eq!(format!("{:.4}", first.best_f), format!("{:.4}", second.best_f));
    assert_eq!(first.best, second.best);
    assert_eq!(first.metrics.iterations, 200);
    assert_eq!(second.metrics.iterations, 200);

    let new_best = |events: &[RecordedEvent]| {
        events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::NewBest { .. }))
            .count()
    };
    assert_eq!(new_best(&first_events), new_best(&second_events));
}

#[test]
fn ten_customer_scenario_is_feasible_and_two_routed() {
    let instance = ten_customer_scenario();
    let (outcome, _) = run_scenario(42);
    assert!(outcome.best.is_complete(&instance));
    assert!(outcome.best.is_feasible(&instance));
    assert!(outcome.best.non_empty_routes() >= 2);
}

#[test]
fn file_sinks_follow_the_search() {
    let dir = tempfile::tempdir().unwrap();
    let csv = ConvergenceCsvSink::create(dir.path(), "grid").unwrap();
    let sol = SolutionFileSink::new(dir.path(), "grid");
    let recording = RecordingSink::new();
    let sink = CompositeSink::new()
        .with(sol)
        .with(csv)
        .with(recording.clone());

    let mut engine = SearchEngineBuilder::new(grid(4, 1, 6), scenario(8).with_iteration_limit(60))
        .with_clock(ManualClock::frozen())
        .with_sink(sink)
        .build()
        .unwrap();
    let outcome = engine.run().unwrap();

    let rows = fs::read_to_string(dir.path().join("grid.csv")).unwrap();
    assert_eq!(rows.lines().count(), 1 + recording.new_best_count());
    let last_row = rows.lines().last().unwrap();
    assert!(last_row.ends_with(&format!(";{:.4}", outcome.best_f)));

    let record = fs::read_to_string(dir.path().join("grid.sol")).unwrap();
    assert!(record.starts_with("Route #1:"));
    assert!(record.contains(&format!("Cost {:.4}", outcome.best_f)));
    assert_eq!(
        record.lines().filter(|l| l.starts_with("Route #")).count(),
        outcome.best.non_empty_routes()
    );
}

#[test]
fn solve_files_reads_instance_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let instance_path = dir.path().join("toy.vrp");
    let config_path = dir.path().join("search.toml");
    fs::write(&instance_path, TOY_VRP).unwrap();
    fs::write(
        &config_path,
        r#"
random_seed = 5
perturbations = ["concentric", "sequential", "decomposition"]

[termination]
criterion = "iteration"
limit = 40

[selection]
type = "periodic_forced"
operator = "decomposition"
period = 10
"#,
    )
    .unwrap();

    let outcome = solve_files(&instance_path, Some(config_path.as_path())).unwrap();
    assert_eq!(outcome.metrics.iterations, 40);
    assert_eq!(outcome.best.customer_count(), 6);
    assert!(outcome.best.non_empty_routes() >= 2);
}

#[test]
fn solve_files_reports_bad_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.vrp");
    assert!(matches!(
        solve_files(&missing, None),
        Err(AilsError::Instance(_))
    ));

    let instance_path = dir.path().join("toy.vrp");
    let config_path = dir.path().join("bad.yaml");
    fs::write(&instance_path, TOY_VRP).unwrap();
    fs::write(&config_path, "perturbations: [shaking]\n").unwrap();
    assert!(matches!(
        solve_files(&instance_path, Some(config_path.as_path())),
        Err(AilsError::Config(_))
    ));
}

#[test]
fn known_optimum_ends_the_search_early() {
    let instance = ten_customer_scenario();
    let config = SearchConfig::new()
        .with_random_seed(1)
        .with_iteration_limit(10_000)
        .with_optimal(f64::MAX);
    let outcome = solve(instance, config).unwrap();
    assert_eq!(outcome.metrics.iterations, 0);
    assert_eq!(outcome.metrics.convergence_iteration(), None);
}

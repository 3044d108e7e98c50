//! Tests for perturbation operators and selection.

use ails_config::{PerturbationKind, SearchConfig, SelectionConfig};
use ails_core::{AilsError, Solution};
use ails_test::instances::{grid, ring, ten_customer_scenario};
use rand::SeedableRng;

use super::*;
use crate::heuristic::{CapacityRepair, FeasibilityRepair, InsertionHeuristic};
use crate::scope::SearchRng;

const KINDS: [PerturbationKind; 3] = [
    PerturbationKind::Sequential,
    PerturbationKind::Concentric,
    PerturbationKind::Decomposition,
];

fn start(instance: &ails_core::Instance) -> Solution {
    Solution::with_routes(instance, vec![(1..=8).collect(), (9..=16).collect()])
}

fn apply(op: &mut dyn Perturbation, solution: &mut Solution, omega: f64, seed: u64) {
    let instance = grid(4, 1, 100);
    let mut rng = SearchRng::seed_from_u64(seed);
    let omega = op.is_adjustable().then_some(omega);
    let mut ctx = PerturbationContext {
        instance: &instance,
        rng: &mut rng,
        omega,
    };
    op.apply(&mut ctx, solution);
}

#[test]
fn test_removal_count() {
    assert_eq!(removal_count(Some(3.4), 10), 3);
    assert_eq!(removal_count(Some(3.6), 10), 4);
    assert_eq!(removal_count(Some(0.2), 10), 1);
    assert_eq!(removal_count(Some(50.0), 10), 10);
    assert_eq!(removal_count(None, 10), 1);
    assert_eq!(removal_count(Some(f64::NAN), 10), 1);
}

#[test]
fn test_operators_keep_every_customer() {
    let instance = grid(4, 1, 100);
    let registry = PerturbationRegistry::default();
    let mut operators = registry
        .build(&KINDS, &PerturbationSettings::default())
        .unwrap();

    for op in operators.iter_mut() {
        for seed in 0..10 {
            let mut solution = start(&instance);
            apply(op.as_mut(), &mut solution, 5.0, seed);
            assert!(
                solution.is_complete(&instance),
                "{} lost customers",
                op.kind()
            );
            let mut check = solution.clone();
            check.recompute(&instance);
            assert!((check.f() - solution.f()).abs() < 1e-9);
        }
    }
}

#[test]
fn test_operators_are_deterministic() {
    let instance = grid(4, 1, 100);
    for kind in KINDS {
        let run = |seed| {
            let mut op = PerturbationRegistry::default()
                .build(&[kind], &PerturbationSettings::default())
                .unwrap()
                .remove(0);
            let mut solution = start(&instance);
            apply(op.as_mut(), &mut solution, 4.0, seed);
            solution
        };
        assert_eq!(run(7), run(7));
    }
}

#[test]
fn test_sequential_removes_omega_customers() {
    // with a single cost heuristic the removed set is the only source of change
    let instance = ring(12, 10.0, 1, 100);
    let original = Solution::with_routes(&instance, vec![(1..=12).collect()]);
    let mut op = SequentialRemoval::new(vec![InsertionHeuristic::Cost]);
    let mut rng = SearchRng::seed_from_u64(3);
    let mut solution = original.clone();
    let mut ctx = PerturbationContext {
        instance: &instance,
        rng: &mut rng,
        omega: Some(3.0),
    };
    op.apply(&mut ctx, &mut solution);
    assert_eq!(op.removed().len(), 3);
    assert!(solution.is_complete(&instance));
}

#[test]
fn test_concentric_removes_seed_neighborhood() {
    let instance = ring(12, 10.0, 1, 100);
    let mut op = ConcentricRemoval::new(vec![InsertionHeuristic::Distance]);
    let mut rng = SearchRng::seed_from_u64(11);
    let mut solution = Solution::with_routes(&instance, vec![(1..=12).collect()]);
    let mut ctx = PerturbationContext {
        instance: &instance,
        rng: &mut rng,
        omega: Some(3.0),
    };
    op.apply(&mut ctx, &mut solution);

    let mut removed = op.removed().to_vec();
    removed.sort_unstable();
    assert_eq!(removed.len(), 3);
    // a seed and its two ring neighbors span at most two consecutive gaps
    let span = |a: usize, b: usize| {
        let d = a.abs_diff(b);
        d.min(12 - d)
    };
    let max_span = removed
        .iter()
        .flat_map(|&a| removed.iter().map(move |&b| span(a, b)))
        .max()
        .unwrap();
    assert!(max_span <= 2);
}

#[test]
fn test_decomposition_is_not_adjustable() {
    let op = Decomposition::new(2);
    assert!(!op.is_adjustable());
    assert_eq!(op.kind(), PerturbationKind::Decomposition);
    assert_eq!(Decomposition::new(0).routes(), 1);
}

#[test]
fn test_decomposition_overflow_is_repairable() {
    let instance = ten_customer_scenario();
    let mut solution = Solution::with_routes(
        &instance,
        vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]],
    );
    let mut op = Decomposition::new(2);
    let mut rng = SearchRng::seed_from_u64(5);
    let mut ctx = PerturbationContext {
        instance: &instance,
        rng: &mut rng,
        omega: None,
    };
    op.apply(&mut ctx, &mut solution);

    assert!(solution.is_complete(&instance));
    CapacityRepair::new().make_feasible(&instance, &mut solution, &mut rng);
    assert!(solution.is_feasible(&instance));
}

#[test]
fn test_uniform_selection_covers_portfolio() {
    let mut rng = SearchRng::seed_from_u64(1);
    let policy = SelectionPolicy::UniformRandom;
    let mut seen = [false; 3];
    for iteration in 1..=200 {
        let selection = policy.select(iteration, 3, &mut rng);
        assert!(!selection.forced);
        seen[selection.index] = true;
    }
    assert_eq!(seen, [true; 3]);
}

#[test]
fn test_fixed_index_selection() {
    let mut rng = SearchRng::seed_from_u64(1);
    let policy = SelectionPolicy::from_config(&SelectionConfig::FixedIndex { index: 1 }, &KINDS)
        .unwrap();
    for iteration in 1..=20 {
        assert_eq!(
            policy.select(iteration, 3, &mut rng),
            Selection {
                index: 1,
                forced: false
            }
        );
    }
    let err = SelectionPolicy::from_config(&SelectionConfig::FixedIndex { index: 3 }, &KINDS);
    assert!(matches!(err, Err(AilsError::Config(_))));
}

#[test]
fn test_periodic_forced_selection() {
    let mut rng = SearchRng::seed_from_u64(1);
    let policy = SelectionPolicy::periodic_forced(&KINDS, PerturbationKind::Decomposition, 5)
        .unwrap();
    for iteration in 1..=50 {
        let selection = policy.select(iteration, 3, &mut rng);
        if iteration % 5 == 0 {
            assert_eq!(
                selection,
                Selection {
                    index: 2,
                    forced: true
                }
            );
        } else {
            assert!(!selection.forced);
            assert_ne!(selection.index, 2);
        }
    }
}

#[test]
fn test_period_zero_never_forces() {
    let mut rng = SearchRng::seed_from_u64(1);
    let policy = SelectionPolicy::periodic_forced(&KINDS, PerturbationKind::Sequential, 0)
        .unwrap();
    for iteration in 1..=30 {
        let selection = policy.select(iteration, 3, &mut rng);
        assert!(!selection.forced);
        assert_ne!(selection.index, 0);
    }
}

#[test]
fn test_forced_operator_must_leave_others() {
    let kinds = [PerturbationKind::Concentric, PerturbationKind::Concentric];
    let err = SelectionPolicy::periodic_forced(&kinds, PerturbationKind::Concentric, 3);
    assert!(matches!(err, Err(AilsError::Config(_))));

    let err = SelectionPolicy::periodic_forced(&kinds, PerturbationKind::Sequential, 3);
    assert!(matches!(err, Err(AilsError::Config(_))));
}

#[test]
fn test_registry_rejects_unknown_and_empty() {
    let registry = PerturbationRegistry::new();
    let err = registry.build(&[PerturbationKind::Sequential], &PerturbationSettings::default());
    assert!(matches!(err, Err(AilsError::Config(_))));

    let err = PerturbationRegistry::default().build(&[], &PerturbationSettings::default());
    assert!(matches!(err, Err(AilsError::Config(_))));
}

#[test]
fn test_registry_custom_factory() {
    let mut registry = PerturbationRegistry::new();
    registry.register(PerturbationKind::Decomposition, |_| {
        Box::new(Decomposition::new(5))
    });
    assert!(registry.contains(PerturbationKind::Decomposition));
    assert!(!registry.contains(PerturbationKind::Sequential));

    // a factory that builds the wrong operator is refused
    registry.register(PerturbationKind::Sequential, |_| Box::new(Decomposition::new(1)));
    let err = registry.build(&[PerturbationKind::Sequential], &PerturbationSettings::default());
    assert!(matches!(err, Err(AilsError::Config(_))));
}

#[test]
fn test_portfolio_from_config() {
    let config = SearchConfig::new()
        .with_perturbations(KINDS.to_vec())
        .with_selection(SelectionConfig::PeriodicForced {
            operator: PerturbationKind::Decomposition,
            period: 4,
        });
    let portfolio = PerturbationPortfolio::from_config(&config, &PerturbationRegistry::default())
        .unwrap();
    assert_eq!(portfolio.len(), 3);
    assert_eq!(portfolio.kinds(), KINDS.to_vec());
    assert!(portfolio.policy().is_forced_iteration(8));
    assert!(!portfolio.operator(2).is_adjustable());
}

#[test]
fn test_portfolio_rejects_bad_policy() {
    let operators = PerturbationRegistry::default()
        .build(&KINDS[..2], &PerturbationSettings::default())
        .unwrap();
    let err = PerturbationPortfolio::new(operators, SelectionPolicy::FixedIndex(2));
    assert!(matches!(err, Err(AilsError::Config(_))));
}

#[test]
fn test_operators_keep_minimum_routes() {
    let instance = ten_customer_scenario();
    let registry = PerturbationRegistry::default();
    let mut operators = registry
        .build(&KINDS, &PerturbationSettings::default())
        .unwrap();

    for op in operators.iter_mut() {
        for seed in 0..20 {
            let mut solution =
                Solution::with_routes(&instance, vec![(1..=9).collect(), vec![10]]);
            let mut rng = SearchRng::seed_from_u64(seed);
            let omega = op.is_adjustable().then_some(10.0);
            let mut ctx = PerturbationContext {
                instance: &instance,
                rng: &mut rng,
                omega,
            };
            op.apply(&mut ctx, &mut solution);

            assert!(solution.is_complete(&instance));
            assert!(
                solution.non_empty_routes() >= instance.min_number_routes(),
                "{} dropped a route",
                op.kind()
            );
        }
    }
}

//! Test utilities for ails-solver.
//!
//! Re-exports the shared fixtures from `ails-test` and adds collaborators
//! that let tests pin down individual engine decisions.

use ails_config::SearchConfig;
use ails_core::{Instance, Solution};

use crate::acceptance::AcceptanceCriterion;
use crate::clock::ManualClock;
use crate::engine::SearchEngineBuilder;
use crate::heuristic::{ConstructionHeuristic, FeasibilityRepair, LocalSearch};
use crate::perturbation::{Perturbation, PerturbationContext};
use crate::scope::SearchRng;

pub use ails_test::instances::{grid, ten_customer_scenario, tight};

/// Builder with a frozen manual clock, so runs never depend on timing.
pub fn frozen_builder(instance: Instance, config: SearchConfig) -> SearchEngineBuilder {
    SearchEngineBuilder::new(instance, config).with_clock(ManualClock::frozen())
}

/// Rejects every candidate.
#[derive(Debug, Default)]
pub struct RejectAll;

impl AcceptanceCriterion for RejectAll {
    fn accept(&self, _candidate: &Solution, _reference: &Solution) -> bool {
        false
    }
}

/// Puts every customer into the first route.
#[derive(Debug, Default)]
pub struct SingleRouteConstruction;

impl ConstructionHeuristic for SingleRouteConstruction {
    fn construct(&mut self, instance: &Instance, solution: &mut Solution, _rng: &mut SearchRng) {
        solution.reset(1);
        for customer in instance.customers() {
            let end = solution.route(0).len();
            solution.insert(instance, 0, end, customer);
        }
    }
}

/// Leaves the solution untouched.
#[derive(Debug, Default)]
pub struct NoRepair;

impl FeasibilityRepair for NoRepair {
    fn make_feasible(&mut self, _instance: &Instance, _solution: &mut Solution, _rng: &mut SearchRng) {}
}

/// Leaves the solution untouched.
#[derive(Debug, Default)]
pub struct NoLocalSearch;

impl LocalSearch for NoLocalSearch {
    fn improve(
        &mut self,
        _instance: &Instance,
        _solution: &mut Solution,
        _full_pass: bool,
        _rng: &mut SearchRng,
    ) {
    }
}

/// Delegates to `inner` but declares its own omega bounds.
#[derive(Debug)]
pub struct BoundedOmega<P> {
    pub inner: P,
    pub bounds: (f64, f64),
}

impl<P: Perturbation> Perturbation for BoundedOmega<P> {
    fn kind(&self) -> ails_config::PerturbationKind {
        self.inner.kind()
    }

    fn is_adjustable(&self) -> bool {
        self.inner.is_adjustable()
    }

    fn omega_bounds(&self, _customers: usize) -> Option<(f64, f64)> {
        Some(self.bounds)
    }

    fn apply(&mut self, ctx: &mut PerturbationContext<'_>, solution: &mut Solution) {
        self.inner.apply(ctx, solution);
    }
}

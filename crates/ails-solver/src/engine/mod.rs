//! The AILS-II search engine.
//!
//! [`SearchEngine`] owns the three solutions of a run (working candidate,
//! reference and best) and every collaborator. One iteration clones the
//! reference, perturbs it with the selected operator, repairs and improves
//! the result, measures its distance to the reference, tracks the best
//! solution, feeds the diversity controller and finally decides whether the
//! candidate replaces the reference.

mod builder;
mod state;

use std::sync::Arc;

use ails_config::PerturbationKind;
use ails_core::{AilsError, Instance, Result, Solution};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::acceptance::AcceptanceCriterion;
use crate::diversity::{DiversityController, OmegaKey};
use crate::heuristic::{ConstructionHeuristic, FeasibilityRepair, LocalSearch, SolutionDistance};
use crate::perturbation::{PerturbationContext, PerturbationPortfolio};
use crate::scope::SearchScope;
use crate::sink::{ResultSink, SinkError};
use crate::stats::{self, ConvergenceMetrics};
use crate::termination::Termination;

pub use builder::SearchEngineBuilder;
pub use state::EngineState;

/// Summary of one perturbation iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationReport {
    /// 1-based iteration number.
    pub iteration: u64,
    pub operator: PerturbationKind,
    /// Portfolio index of the operator.
    pub operator_index: usize,
    /// Accepted without consulting the acceptance criterion.
    pub forced: bool,
    /// Omega used, `None` for operators without one.
    pub omega: Option<f64>,
    /// Distance between the improved candidate and the reference.
    pub distance: f64,
    /// Cost of the improved candidate.
    pub cost: f64,
    pub accepted: bool,
    /// The candidate became the new best solution.
    pub improved: bool,
    /// Number of omega states adjusted after this iteration.
    pub adjustments: usize,
}

/// Result of [`SearchEngine::run`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Solution,
    pub best_f: f64,
    pub metrics: ConvergenceMetrics,
    /// Improvements of the best solution found while iterating.
    pub improvements: u64,
    /// Percent gap to the known optimum, if one is configured.
    pub gap: Option<f64>,
}

/// Single-threaded AILS-II search over one instance.
///
/// Build it with [`SearchEngineBuilder`]. [`run`](Self::run) performs the
/// whole search; [`initialize`](Self::initialize), [`step`](Self::step),
/// [`is_terminated`](Self::is_terminated) and [`finish`](Self::finish) expose
/// the same loop one iteration at a time.
pub struct SearchEngine {
    instance: Arc<Instance>,
    epsilon: f64,
    optimal: Option<f64>,
    construction: Box<dyn ConstructionHeuristic>,
    repair: Box<dyn FeasibilityRepair>,
    local_search: Box<dyn LocalSearch>,
    distance: Box<dyn SolutionDistance>,
    acceptance: Box<dyn AcceptanceCriterion>,
    portfolio: PerturbationPortfolio,
    diversity: DiversityController,
    termination: Box<dyn Termination>,
    sink: Box<dyn ResultSink>,
    scope: SearchScope,
    state: EngineState,
    solution: Solution,
    reference: Solution,
    best: Solution,
}

impl SearchEngine {
    /// Runs the whole search: initial solution, iterations until the
    /// stopping criterion holds, then the final report.
    ///
    /// # Errors
    ///
    /// [`AilsError::InvalidState`] if the engine already ran, and
    /// [`AilsError::Config`] if the initial solution cannot be made feasible.
    pub fn run(&mut self) -> Result<SearchOutcome> {
        self.initialize()?;
        while !self.is_terminated() {
            self.step()?;
        }
        self.finish()
    }

    /// Builds the initial reference solution and records it as the best.
    ///
    /// Construction starts from `min_number_routes` routes and is followed by
    /// feasibility repair and a full local search pass.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != EngineState::Created {
            return Err(self.out_of_order("initialize"));
        }
        self.scope.start_search();
        let instance = Arc::clone(&self.instance);
        info!(
            event = "search_start",
            instance = instance.name(),
            customers = instance.size(),
            capacity = instance.capacity(),
            min_routes = instance.min_number_routes(),
            seed = self.scope.seed(),
            operators = self.portfolio.len(),
        );

        self.enter(EngineState::Constructing);
        self.reference.reset(instance.min_number_routes());
        self.construction
            .construct(&instance, &mut self.reference, self.scope.rng());

        self.enter(EngineState::Repairing);
        self.repair
            .make_feasible(&instance, &mut self.reference, self.scope.rng());

        self.enter(EngineState::LocalSearching);
        self.local_search
            .improve(&instance, &mut self.reference, true, self.scope.rng());

        if !self.reference.is_complete(&instance) || !self.reference.is_feasible(&instance) {
            self.enter(EngineState::Stopped);
            return Err(AilsError::Config(format!(
                "initial solution is not feasible after repair (excess load {}, {} of {} customers routed)",
                self.reference.excess_load(&instance),
                self.reference.customer_count(),
                instance.size()
            )));
        }

        self.best.clone_from(&self.reference);
        let time = self.scope.elapsed();
        self.scope.set_initial_best(self.best.f(), time);
        info!(
            event = "initial_solution",
            cost = self.best.f(),
            routes = self.best.non_empty_routes(),
            time = time,
        );
        let result = self.sink.on_initial(&self.best, self.best.f(), time);
        report_sink_error("initial", result);

        self.enter(EngineState::Iterating);
        Ok(())
    }

    /// Performs one perturbation iteration.
    pub fn step(&mut self) -> Result<IterationReport> {
        if self.state != EngineState::Iterating {
            return Err(self.out_of_order("step"));
        }
        let instance = Arc::clone(&self.instance);
        let iteration = self.scope.increment_iteration();

        self.solution.clone_from(&self.reference);
        let selection = self.portfolio.select(iteration, self.scope.rng());
        let operator = self.portfolio.operator_mut(selection.index);
        let kind = operator.kind();
        let key = OmegaKey::new(kind, self.solution.non_empty_routes());
        let bounds = operator
            .omega_bounds(instance.size())
            .unwrap_or(self.diversity.bounds());
        let omega = operator
            .is_adjustable()
            .then(|| self.diversity.omega_within(key, bounds));

        let mut ctx = PerturbationContext {
            instance: &instance,
            rng: self.scope.rng(),
            omega,
        };
        operator.apply(&mut ctx, &mut self.solution);

        self.repair
            .make_feasible(&instance, &mut self.solution, self.scope.rng());
        self.local_search
            .improve(&instance, &mut self.solution, true, self.scope.rng());
        if !self.solution.is_feasible(&instance) {
            warn!(
                event = "infeasible_candidate",
                iteration = iteration,
                excess_load = self.solution.excess_load(&instance),
            );
        }

        let distance = self.distance.distance(&self.solution, &self.reference);
        let improved = self.evaluate_best();

        let progress = self.termination.progress(&self.scope).unwrap_or(0.0);
        let adjustments = self.diversity.adjust(progress);
        if omega.is_some() {
            self.diversity.record_distance(key, distance);
        }

        self.acceptance.record(&self.solution, progress);
        let accepted = selection.forced || self.acceptance.accept(&self.solution, &self.reference);
        if accepted {
            self.reference.clone_from(&self.solution);
        }

        let report = IterationReport {
            iteration,
            operator: kind,
            operator_index: selection.index,
            forced: selection.forced,
            omega,
            distance,
            cost: self.solution.f(),
            accepted,
            improved,
            adjustments: adjustments.len(),
        };
        debug!(
            event = "iteration",
            iteration = iteration,
            operator = kind.as_str(),
            forced = selection.forced,
            omega = ?omega,
            distance = distance,
            cost = report.cost,
            accepted = accepted,
            best = self.scope.best_f(),
        );
        Ok(report)
    }

    /// Whether the stopping criterion holds.
    pub fn is_terminated(&self) -> bool {
        self.termination.is_terminated(&self.scope)
    }

    /// Stops the search, records the total time and reports the best
    /// solution to the sink.
    pub fn finish(&mut self) -> Result<SearchOutcome> {
        if self.state != EngineState::Iterating {
            return Err(self.out_of_order("finish"));
        }
        let total_time = self.scope.finish_search();
        self.enter(EngineState::Stopped);

        let result = self.sink.on_finished(&self.best, self.best.f(), total_time);
        report_sink_error("finished", result);

        let outcome = self.outcome();
        info!(
            event = "search_end",
            cost = outcome.best_f,
            iterations = outcome.metrics.iterations,
            iteration_of_best = outcome.metrics.iteration_of_best,
            time_of_best = outcome.metrics.time_of_best,
            total_time = total_time,
            improvements = outcome.improvements,
            routes = self.best.non_empty_routes(),
        );
        Ok(outcome)
    }

    /// Replaces the best solution when `solution` improves on it by more than
    /// epsilon. Incomplete or infeasible candidates never qualify.
    fn evaluate_best(&mut self) -> bool {
        let instance = &self.instance;
        if !self.solution.is_complete(instance) || !self.solution.is_feasible(instance) {
            return false;
        }
        let f = self.solution.f();
        if f - self.scope.best_f() >= -self.epsilon {
            return false;
        }

        self.best.clone_from(&self.solution);
        let time = self.scope.elapsed();
        self.scope.record_improvement(f, time);
        let iteration = self.scope.iteration();
        info!(
            event = "new_best",
            iteration = iteration,
            time = time,
            cost = f,
            routes = self.best.non_empty_routes(),
        );
        let result = self.sink.on_new_best(iteration, time, f, &self.best);
        report_sink_error("new_best", result);
        true
    }

    fn outcome(&self) -> SearchOutcome {
        SearchOutcome {
            best: self.best.clone(),
            best_f: self.best.f(),
            metrics: self.metrics(),
            improvements: self.scope.improvements(),
            gap: self.gap(),
        }
    }

    fn enter(&mut self, state: EngineState) {
        debug!(event = "engine_state", from = %self.state, to = %state);
        self.state = state;
    }

    fn out_of_order(&self, operation: &str) -> AilsError {
        AilsError::InvalidState(format!(
            "cannot {} a search engine in state '{}'",
            operation, self.state
        ))
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn best_solution(&self) -> &Solution {
        &self.best
    }

    /// Best cost so far; infinite before initialization.
    pub fn best_f(&self) -> f64 {
        self.scope.best_f()
    }

    pub fn reference_solution(&self) -> &Solution {
        &self.reference
    }

    /// Candidate of the last iteration.
    pub fn working_solution(&self) -> &Solution {
        &self.solution
    }

    /// Perturbation iterations performed.
    pub fn iteration(&self) -> u64 {
        self.scope.iteration()
    }

    /// Elapsed seconds since initialization, frozen once finished.
    pub fn elapsed(&self) -> f64 {
        self.scope.total_time().unwrap_or_else(|| self.scope.elapsed())
    }

    pub fn metrics(&self) -> ConvergenceMetrics {
        ConvergenceMetrics {
            iterations: self.scope.iteration(),
            iteration_of_best: self.scope.iteration_of_best(),
            time_of_best: self.scope.time_of_best(),
            total_time: self.elapsed(),
        }
    }

    /// Percent gap of the best cost to the configured optimum.
    pub fn gap(&self) -> Option<f64> {
        self.optimal.and_then(|optimal| stats::gap(self.best.f(), optimal))
    }

    /// Current omega of every `(operator, routes)` state seen so far.
    pub fn omega_snapshot(&self) -> Vec<(OmegaKey, f64)> {
        self.diversity.snapshot()
    }

    pub fn diversity(&self) -> &DiversityController {
        &self.diversity
    }

    pub fn portfolio(&self) -> &PerturbationPortfolio {
        &self.portfolio
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("instance", &self.instance.name())
            .field("state", &self.state)
            .field("iteration", &self.scope.iteration())
            .field("best_f", &self.scope.best_f())
            .field("portfolio", &self.portfolio)
            .finish()
    }
}

fn report_sink_error(event: &'static str, result: std::result::Result<(), SinkError>) {
    if let Err(err) = result {
        warn!(event = "sink_error", sink_event = event, error = %err);
    }
}

#[cfg(test)]
mod tests;

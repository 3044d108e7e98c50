//! Assembles a [`SearchEngine`] from a [`SearchConfig`].

use std::sync::Arc;

use ails_config::SearchConfig;
use ails_core::{Instance, Result, Solution};
use tracing::info;

use super::{EngineState, SearchEngine};
use crate::acceptance::{build_acceptance, AcceptanceCriterion};
use crate::clock::{Clock, ThreadCpuClock};
use crate::diversity::DiversityController;
use crate::heuristic::{
    CapacityRepair, ConstructionHeuristic, EdgeDistance, FeasibilityRepair, GranularLocalSearch,
    LocalSearch, RandomInsertionConstruction, SolutionDistance,
};
use crate::perturbation::{PerturbationPortfolio, PerturbationRegistry};
use crate::scope::SearchScope;
use crate::sink::{NoopSink, ResultSink};
use crate::termination::{StoppingCriterion, Termination};

/// Builder for [`SearchEngine`].
///
/// Every collaborator defaults to the implementation the configuration
/// describes; any of them can be replaced before [`build`](Self::build).
/// The configuration is validated once, in `build`.
///
/// # Example
///
/// ```
/// use ails_config::SearchConfig;
/// use ails_solver::clock::ManualClock;
/// use ails_solver::engine::SearchEngineBuilder;
/// use ails_test::instances::ten_customer_scenario;
///
/// let config = SearchConfig::new().with_random_seed(7).with_iteration_limit(20);
/// let mut engine = SearchEngineBuilder::new(ten_customer_scenario(), config)
///     .with_clock(ManualClock::frozen())
///     .build()
///     .unwrap();
///
/// let outcome = engine.run().unwrap();
/// assert_eq!(outcome.metrics.iterations, 20);
/// assert!(outcome.best.is_feasible(engine.instance()));
/// ```
pub struct SearchEngineBuilder {
    instance: Arc<Instance>,
    config: SearchConfig,
    registry: Option<PerturbationRegistry>,
    construction: Option<Box<dyn ConstructionHeuristic>>,
    repair: Option<Box<dyn FeasibilityRepair>>,
    local_search: Option<Box<dyn LocalSearch>>,
    distance: Option<Box<dyn SolutionDistance>>,
    acceptance: Option<Box<dyn AcceptanceCriterion>>,
    termination: Option<Box<dyn Termination>>,
    sink: Option<Box<dyn ResultSink>>,
    clock: Option<Box<dyn Clock>>,
}

impl SearchEngineBuilder {
    pub fn new(instance: impl Into<Arc<Instance>>, config: SearchConfig) -> Self {
        Self {
            instance: instance.into(),
            config,
            registry: None,
            construction: None,
            repair: None,
            local_search: None,
            distance: None,
            acceptance: None,
            termination: None,
            sink: None,
            clock: None,
        }
    }

    /// Registry used to build the perturbation portfolio.
    pub fn with_registry(mut self, registry: PerturbationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_construction(mut self, construction: impl ConstructionHeuristic + 'static) -> Self {
        self.construction = Some(Box::new(construction));
        self
    }

    pub fn with_repair(mut self, repair: impl FeasibilityRepair + 'static) -> Self {
        self.repair = Some(Box::new(repair));
        self
    }

    pub fn with_local_search(mut self, local_search: impl LocalSearch + 'static) -> Self {
        self.local_search = Some(Box::new(local_search));
        self
    }

    pub fn with_distance(mut self, distance: impl SolutionDistance + 'static) -> Self {
        self.distance = Some(Box::new(distance));
        self
    }

    pub fn with_acceptance(mut self, acceptance: impl AcceptanceCriterion + 'static) -> Self {
        self.acceptance = Some(Box::new(acceptance));
        self
    }

    /// Replaces the configured stopping criterion.
    pub fn with_termination(mut self, termination: impl Termination + 'static) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Clock measuring elapsed time; thread CPU time by default.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Validates the configuration and assembles the engine.
    ///
    /// # Errors
    ///
    /// [`AilsError::Config`](ails_core::AilsError::Config) for an invalid configuration or a portfolio that
    /// cannot be built.
    pub fn build(self) -> Result<SearchEngine> {
        let config = self.config;
        config.validate()?;

        let registry = self.registry.unwrap_or_default();
        let portfolio = PerturbationPortfolio::from_config(&config, &registry)?;
        let diversity = DiversityController::from_config(&config, self.instance.size());

        let seed = match config.random_seed {
            Some(seed) => seed,
            None => {
                info!(event = "default_seed", seed = 0u64);
                0
            }
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(ThreadCpuClock::new()));
        let termination = self
            .termination
            .unwrap_or_else(|| Box::new(StoppingCriterion::from_config(&config.termination)));

        Ok(SearchEngine {
            instance: self.instance,
            epsilon: config.epsilon,
            optimal: config.termination.optimal,
            construction: self
                .construction
                .unwrap_or_else(|| Box::new(RandomInsertionConstruction::new())),
            repair: self.repair.unwrap_or_else(|| Box::new(CapacityRepair::new())),
            local_search: self.local_search.unwrap_or_else(|| {
                Box::new(GranularLocalSearch::new(config.local_search.neighborhood_size))
            }),
            distance: self.distance.unwrap_or_else(|| Box::new(EdgeDistance::new())),
            acceptance: self
                .acceptance
                .unwrap_or_else(|| build_acceptance(&config.acceptance, config.gamma)),
            portfolio,
            diversity,
            termination,
            sink: self.sink.unwrap_or_else(|| Box::new(NoopSink)),
            scope: SearchScope::new(clock, seed),
            state: EngineState::Created,
            solution: Solution::new(),
            reference: Solution::new(),
            best: Solution::new(),
        })
    }
}

impl std::fmt::Debug for SearchEngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngineBuilder")
            .field("instance", &self.instance.name())
            .field("config", &self.config)
            .finish()
    }
}

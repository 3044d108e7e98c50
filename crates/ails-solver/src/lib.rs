//! AILS Solver - the AILS-II search engine
//!
//! This crate provides the iterated local search and its collaborators:
//! - [`SearchEngine`] and [`SearchEngineBuilder`]
//! - Perturbation operators, their registry and the selection policy
//! - Diversity control: omega tuning against an annealed ideal distance
//! - Acceptance criteria and stopping criteria
//! - Default construction, repair, local search and pairwise distance
//! - Result sinks for observing progress
//! - Injectable clocks (thread CPU time, monotonic, manual)

pub mod acceptance;
pub mod clock;
pub mod diversity;
pub mod engine;
pub mod heuristic;
pub mod perturbation;
pub mod scope;
pub mod sink;
pub mod stats;
pub mod termination;

#[cfg(test)]
pub(crate) mod test_utils;

pub use acceptance::{
    build_acceptance, AcceptAll, AcceptanceCriterion, BetterThanReference, ThresholdAcceptance,
};
pub use clock::{Clock, ManualClock, MonotonicClock, ThreadCpuClock};
pub use diversity::{
    DiversityController, IdealDistanceSchedule, OmegaAdjustment, OmegaKey, OmegaState,
};
pub use engine::{EngineState, IterationReport, SearchEngine, SearchEngineBuilder, SearchOutcome};
pub use heuristic::{
    cheapest_insertion, CapacityRepair, ConstructionHeuristic, EdgeDistance, FeasibilityRepair,
    GranularLocalSearch, InsertionHeuristic, InsertionPoint, LocalSearch,
    RandomInsertionConstruction, SolutionDistance,
};
pub use perturbation::{
    ConcentricRemoval, Decomposition, Perturbation, PerturbationContext, PerturbationFactory,
    PerturbationPortfolio, PerturbationRegistry, PerturbationSettings, Selection,
    SelectionPolicy, SequentialRemoval,
};
pub use scope::{SearchRng, SearchScope};
pub use sink::{
    CompositeSink, LoggingSink, NoopSink, RecordedEvent, RecordingSink, ResultSink, SinkError,
};
pub use stats::ConvergenceMetrics;
pub use termination::{
    IterationTermination, OptimalCostTermination, OrTermination, StoppingCriterion, Termination,
    TimeTermination,
};

//! AILS-II - Adaptive Iterated Local Search for the CVRP
//!
//! One call wires the whole engine: load an instance, pick a configuration and
//! call [`solve`].
//!
//! # Example
//!
//! ```rust
//! use ails::prelude::*;
//!
//! let instance = Instance::builder("toy")
//!     .depot(Point::new(0.0, 0.0))
//!     .capacity(10)
//!     .customer(Point::new(1.0, 0.0), 4)
//!     .customer(Point::new(0.0, 1.0), 4)
//!     .customer(Point::new(-1.0, 0.0), 4)
//!     .build()
//!     .unwrap();
//! let config = SearchConfig::new().with_random_seed(1).with_iteration_limit(10);
//!
//! let outcome = solve(instance, config).unwrap();
//! assert_eq!(outcome.metrics.iterations, 10);
//! ```

// Problem and solution types
pub use ails_core::{
    loading, AilsError, DistanceMetric, Instance, InstanceBuilder, Point, Result, Route, Solution,
    SolutionRecord, DEPOT,
};

// Configuration
pub use ails_config::{
    AcceptanceConfig, ConfigError, InsertionKind, OmegaRule, PerturbationKind, ScheduleKind,
    SearchConfig, SelectionConfig, StopCriterionKind,
};

// Engine
pub use ails_solver::{
    ConvergenceMetrics, IterationReport, ManualClock, MonotonicClock, PerturbationRegistry,
    SearchEngine, SearchEngineBuilder, SearchOutcome, ThreadCpuClock,
};

// Sinks
pub use ails_solver::sink::{
    CompositeSink, LoggingSink, NoopSink, RecordedEvent, RecordingSink, ResultSink, SinkError,
};

// Collaborator traits for custom components
pub use ails_solver::{
    AcceptanceCriterion, Clock, ConstructionHeuristic, FeasibilityRepair, LocalSearch,
    Perturbation, SolutionDistance, Termination,
};

pub mod io;
mod solver;

pub use io::{ConvergenceCsvSink, SolutionFileSink};
pub use solver::{solve, solve_files, solve_with_sink};

#[cfg(feature = "console")]
pub use ails_console as console;

pub mod prelude {
    pub use super::{solve, solve_files, solve_with_sink};
    pub use super::{AilsError, Instance, Point, Result, Solution};
    pub use super::{PerturbationKind, SearchConfig, SelectionConfig};
    pub use super::{ResultSink, SearchEngineBuilder, SearchOutcome};
}

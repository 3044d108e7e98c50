//! Default collaborators of the search engine.
//!
//! Each collaborator is a trait with one default implementation:
//! - [`ConstructionHeuristic`] / [`RandomInsertionConstruction`]
//! - [`FeasibilityRepair`] / [`CapacityRepair`]
//! - [`LocalSearch`] / [`GranularLocalSearch`]
//! - [`SolutionDistance`] / [`EdgeDistance`]
//!
//! [`InsertionHeuristic`] is shared by construction and the perturbations.

mod construction;
mod distance;
mod insertion;
mod local_search;
mod repair;

pub use construction::{ConstructionHeuristic, RandomInsertionConstruction};
pub use distance::{EdgeDistance, SolutionDistance};
pub use insertion::{cheapest_insertion, InsertionHeuristic, InsertionPoint};
pub use local_search::{GranularLocalSearch, LocalSearch};
pub use repair::{CapacityRepair, FeasibilityRepair};

/// Minimum cost decrease treated as an improvement by the heuristics.
pub(crate) const IMPROVEMENT_EPS: f64 = 1e-9;

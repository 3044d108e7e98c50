//! Perturbation operators and the portfolio that selects among them.
//!
//! An operator disrupts a feasible solution by removing customers and
//! reinserting them; how many is driven by its omega, which the
//! [`DiversityController`](crate::diversity::DiversityController) tunes.
//! Operators with fixed behavior report [`Perturbation::is_adjustable`] as
//! `false` and receive no omega.

mod concentric;
mod decomposition;
mod portfolio;
mod registry;
mod selection;
mod sequential;

use std::fmt::Debug;

use ails_config::PerturbationKind;
use ails_core::{Instance, Solution};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::heuristic::InsertionHeuristic;
use crate::scope::SearchRng;

pub use concentric::ConcentricRemoval;
pub use decomposition::Decomposition;
pub use portfolio::PerturbationPortfolio;
pub use registry::{PerturbationFactory, PerturbationRegistry, PerturbationSettings};
pub use selection::{Selection, SelectionPolicy};
pub use sequential::SequentialRemoval;

/// Everything an operator may use while perturbing.
pub struct PerturbationContext<'a> {
    pub instance: &'a Instance,
    pub rng: &'a mut SearchRng,
    /// Current intensity; `None` for operators that are not adjustable.
    pub omega: Option<f64>,
}

/// A randomized structural disruption of a solution.
pub trait Perturbation: Send + Debug {
    /// Registry identifier.
    fn kind(&self) -> PerturbationKind;

    /// Whether the intensity is tuned through an omega state.
    fn is_adjustable(&self) -> bool {
        true
    }

    /// Omega bounds for an instance with `customers` customers.
    ///
    /// `None` keeps the configured bounds.
    fn omega_bounds(&self, _customers: usize) -> Option<(f64, f64)> {
        None
    }

    /// Mutates `solution` in place.
    fn apply(&mut self, ctx: &mut PerturbationContext<'_>, solution: &mut Solution);
}

/// Number of customers to remove for a given omega.
pub(crate) fn removal_count(omega: Option<f64>, customers: usize) -> usize {
    let omega = omega.unwrap_or(1.0);
    let count = if omega.is_finite() { omega.round() } else { 1.0 };
    (count.max(1.0) as usize).min(customers.max(1))
}

/// Reinsertion shared by the removal operators.
///
/// Draws one heuristic per application and reinserts `removed` in random
/// order. While the solution has fewer than `min_number_routes` non-empty
/// routes, the next customer reopens an empty route instead.
#[derive(Debug, Clone)]
pub(crate) struct Reinsertion {
    heuristics: Vec<InsertionHeuristic>,
}

impl Reinsertion {
    pub(crate) fn new(heuristics: Vec<InsertionHeuristic>) -> Self {
        let heuristics = if heuristics.is_empty() {
            vec![InsertionHeuristic::Cost]
        } else {
            heuristics
        };
        Self { heuristics }
    }

    pub(crate) fn heuristics(&self) -> &[InsertionHeuristic] {
        &self.heuristics
    }

    pub(crate) fn reinsert(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        removed: &mut [usize],
        rng: &mut SearchRng,
    ) {
        let heuristic = self.heuristics[rng.random_range(0..self.heuristics.len())];
        removed.shuffle(rng);
        let mut rest: &[usize] = removed;
        while solution.non_empty_routes() < instance.min_number_routes() {
            let Some((&customer, tail)) = rest.split_first() else {
                break;
            };
            let slot = match solution.routes().iter().position(|r| r.is_empty()) {
                Some(r) => r,
                None => solution.push_route(),
            };
            solution.insert(instance, slot, 0, customer);
            rest = tail;
        }
        for &customer in rest {
            heuristic.insert(instance, solution, customer);
        }
    }
}

#[cfg(test)]
mod tests;

//! Initial solution construction.

use std::fmt::Debug;

use ails_core::{Instance, Solution};
use rand::seq::SliceRandom;

use super::insertion::cheapest_insertion;
use crate::scope::SearchRng;

/// Builds an initial solution.
pub trait ConstructionHeuristic: Send + Debug {
    /// Populates `solution`, whose route count is the target number of routes;
    /// never fewer than `min_number_routes`.
    ///
    /// May leave capacity violations for the repair step.
    fn construct(&mut self, instance: &Instance, solution: &mut Solution, rng: &mut SearchRng);
}

/// Seeds each route with a random customer, then places the rest by cheapest
/// insertion.
///
/// Insertion prefers routes with spare capacity and falls back to the cheapest
/// position overall, leaving the overload to the repair step.
#[derive(Debug, Clone, Default)]
pub struct RandomInsertionConstruction {
    order: Vec<usize>,
}

impl RandomInsertionConstruction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConstructionHeuristic for RandomInsertionConstruction {
    fn construct(&mut self, instance: &Instance, solution: &mut Solution, rng: &mut SearchRng) {
        let routes = solution
            .num_routes()
            .max(instance.min_number_routes())
            .max(1);
        solution.reset(routes);

        self.order.clear();
        self.order.extend(instance.customers());
        self.order.shuffle(rng);

        for (r, &customer) in self.order.iter().take(routes).enumerate() {
            solution.insert(instance, r, 0, customer);
        }
        for &customer in self.order.iter().skip(routes) {
            let point = cheapest_insertion(instance, solution, customer, true)
                .or_else(|| cheapest_insertion(instance, solution, customer, false));
            if let Some(p) = point {
                solution.insert(instance, p.route, p.pos, customer);
            }
        }
    }
}

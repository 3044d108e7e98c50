//! Capacity feasibility repair.

use std::fmt::Debug;

use ails_core::{Instance, Solution};

use super::insertion::cheapest_insertion;
use crate::scope::SearchRng;

/// Removes constraint violations from a solution.
pub trait FeasibilityRepair: Send + Debug {
    /// Mutates `solution` in place until every route respects the capacity.
    fn make_feasible(&mut self, instance: &Instance, solution: &mut Solution, rng: &mut SearchRng);
}

/// Moves customers out of overloaded routes.
///
/// From each overloaded route the customer whose removal saves the most
/// distance goes to the cheapest position with room for it; a new route is
/// opened when no such position exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityRepair;

impl CapacityRepair {
    pub fn new() -> Self {
        Self
    }
}

impl FeasibilityRepair for CapacityRepair {
    fn make_feasible(&mut self, instance: &Instance, solution: &mut Solution, _rng: &mut SearchRng) {
        let capacity = u64::from(instance.capacity());
        while let Some(r) = solution
            .routes()
            .iter()
            .position(|route| route.load() > capacity)
        {
            let route = solution.route(r);
            let Some(pos) = (0..route.len()).min_by(|&a, &b| {
                route
                    .removal_delta(instance, a)
                    .total_cmp(&route.removal_delta(instance, b))
            }) else {
                break;
            };
            let customer = solution.remove(instance, r, pos);

            match cheapest_insertion(instance, solution, customer, true) {
                Some(p) => solution.insert(instance, p.route, p.pos, customer),
                None => {
                    let fresh = solution.push_route();
                    solution.insert(instance, fresh, 0, customer);
                }
            }
        }
    }
}

//! Concentric removal.

use ails_config::PerturbationKind;
use ails_core::Solution;
use rand::Rng;

use super::{removal_count, Perturbation, PerturbationContext, Reinsertion};
use crate::heuristic::InsertionHeuristic;

/// Removes a random seed customer and its omega − 1 nearest customers, then
/// reinserts them.
#[derive(Debug, Clone)]
pub struct ConcentricRemoval {
    reinsertion: Reinsertion,
    removed: Vec<usize>,
}

impl ConcentricRemoval {
    pub fn new(insertion: Vec<InsertionHeuristic>) -> Self {
        Self {
            reinsertion: Reinsertion::new(insertion),
            removed: Vec::new(),
        }
    }

    /// Customers removed by the last application.
    pub fn removed(&self) -> &[usize] {
        &self.removed
    }
}

impl Perturbation for ConcentricRemoval {
    fn kind(&self) -> PerturbationKind {
        PerturbationKind::Concentric
    }

    fn apply(&mut self, ctx: &mut PerturbationContext<'_>, solution: &mut Solution) {
        let instance = ctx.instance;
        let target = removal_count(ctx.omega, instance.size());
        let seed = ctx.rng.random_range(1..=instance.size());
        self.removed.clear();

        let ring = std::iter::once(seed).chain(instance.nearest(seed, target - 1).iter().copied());
        for customer in ring {
            if let Some((r, p)) = solution.locate(customer) {
                self.removed.push(solution.remove(instance, r, p));
            }
        }

        self.reinsertion
            .reinsert(instance, solution, &mut self.removed, ctx.rng);
    }
}

//! Sequential (string) removal.

use ails_config::PerturbationKind;
use ails_core::Solution;
use rand::Rng;

use super::{removal_count, Perturbation, PerturbationContext, Reinsertion};
use crate::heuristic::InsertionHeuristic;

/// Removes strings of consecutive customers, hopping to the nearest routed
/// neighbor after each string, until omega customers are out; then
/// reinserts them.
#[derive(Debug, Clone)]
pub struct SequentialRemoval {
    reinsertion: Reinsertion,
    removed: Vec<usize>,
}

impl SequentialRemoval {
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

impl Perturbation for SequentialRemoval {
    fn kind(&self) -> PerturbationKind {
        PerturbationKind::Sequential
    }

    fn apply(&mut self, ctx: &mut PerturbationContext<'_>, solution: &mut Solution) {
        let instance = ctx.instance;
        let customers = instance.size();
        let target = removal_count(ctx.omega, customers);
        self.removed.clear();

        let mut seed = ctx.rng.random_range(1..=customers);
        while self.removed.len() < target {
            let Some((r, p)) = solution.locate(seed) else {
                break;
            };
            let len = solution.route(r).len();
            let longest = len.min(target - self.removed.len());
            let string = ctx.rng.random_range(1..=longest);
            // the string must cover the seed
            let lo = (p + 1).saturating_sub(string);
            let hi = p.min(len - string);
            let start = ctx.rng.random_range(lo..=hi);
            for _ in 0..string {
                self.removed.push(solution.remove(instance, r, start));
            }

            let removed = &self.removed;
            match instance
                .neighbors(seed)
                .iter()
                .copied()
                .find(|n| !removed.contains(n))
            {
                Some(next) => seed = next,
                None => break,
            }
        }

        self.reinsertion
            .reinsert(instance, solution, &mut self.removed, ctx.rng);
    }
}

//! Route-cluster decomposition.

use ails_config::PerturbationKind;
use ails_core::{Solution, DEPOT};
use rand::Rng;

use super::{Perturbation, PerturbationContext};

/// Rebuilds a cluster of neighboring routes with a sweep around the depot.
///
/// A random route and its nearest routes (by centroid) are emptied; their
/// customers are swept by polar angle from a random starting angle and dealt
/// back into the same routes, moving on when a route is full or when the
/// customers left are only enough to give every remaining route one. No
/// cluster route comes back empty. Overflow stays in the last route for the
/// repair step. The operator has no omega.
#[derive(Debug, Clone)]
pub struct Decomposition {
    routes: usize,
    cluster: Vec<usize>,
    customers: Vec<(f64, usize)>,
}

impl Decomposition {
    /// Rebuilds `routes` routes per application.
    pub fn new(routes: usize) -> Self {
        Self {
            routes: routes.max(1),
            cluster: Vec::new(),
            customers: Vec::new(),
        }
    }

    pub fn routes(&self) -> usize {
        self.routes
    }
}

impl Perturbation for Decomposition {
    fn kind(&self) -> PerturbationKind {
        PerturbationKind::Decomposition
    }

    fn is_adjustable(&self) -> bool {
        false
    }

    fn apply(&mut self, ctx: &mut PerturbationContext<'_>, solution: &mut Solution) {
        let instance = ctx.instance;
        let used: Vec<usize> = (0..solution.num_routes())
            .filter(|&r| !solution.route(r).is_empty())
            .collect();
        if used.is_empty() {
            return;
        }

        let anchor = used[ctx.rng.random_range(0..used.len())];
        let center = solution.route(anchor).centroid(instance);
        let mut by_distance: Vec<(f64, usize)> = used
            .iter()
            .map(|&r| {
                let c = solution.route(r).centroid(instance);
                (((c.x - center.x).powi(2) + (c.y - center.y).powi(2)).sqrt(), r)
            })
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        self.cluster.clear();
        self.cluster
            .extend(by_distance.iter().take(self.routes).map(|&(_, r)| r));

        let depot = instance.point(DEPOT);
        let offset = ctx.rng.random_range(0.0..std::f64::consts::TAU);
        self.customers.clear();
        for &r in &self.cluster {
            for &c in solution.route(r).visits() {
                let angle = (instance.point(c).angle_from(depot) - offset)
                    .rem_euclid(std::f64::consts::TAU);
                self.customers.push((angle, c));
            }
            solution.set_route(instance, r, &[]);
        }
        self.customers
            .sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let capacity = u64::from(instance.capacity());
        let total = self.customers.len();
        let mut slot = 0;
        for (i, &(_, c)) in self.customers.iter().enumerate() {
            let route = self.cluster[slot];
            let load = solution.route(route).load();
            let full = load + u64::from(instance.demand(c)) > capacity;
            let routes_left = self.cluster.len() - slot - 1;
            if load > 0 && routes_left > 0 && (full || total - i <= routes_left) {
                slot += 1;
            }
            let route = self.cluster[slot];
            let end = solution.route(route).len();
            solution.insert(instance, route, end, c);
        }
    }
}

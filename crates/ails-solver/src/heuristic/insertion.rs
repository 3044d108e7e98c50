//! Customer reinsertion.

use ails_config::InsertionKind;
use ails_core::{Instance, Solution};

/// A candidate position `(route, pos)` and its cost delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionPoint {
    pub route: usize,
    pub pos: usize,
    pub delta: f64,
}

/// Cheapest position for `customer` over every route.
///
/// With `respect_capacity`, routes without room for the customer's demand are
/// skipped. Returns `None` when no route qualifies.
pub fn cheapest_insertion(
    instance: &Instance,
    solution: &Solution,
    customer: usize,
    respect_capacity: bool,
) -> Option<InsertionPoint> {
    let capacity = u64::from(instance.capacity());
    let demand = u64::from(instance.demand(customer));
    let mut best: Option<InsertionPoint> = None;
    for (r, route) in solution.routes().iter().enumerate() {
        if respect_capacity && route.load() + demand > capacity {
            continue;
        }
        for pos in 0..=route.len() {
            let delta = route.insertion_delta(instance, pos, customer);
            if best.map_or(true, |b| delta < b.delta) {
                best = Some(InsertionPoint {
                    route: r,
                    pos,
                    delta,
                });
            }
        }
    }
    best
}

/// Reinsertion heuristic used after a perturbation removed customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionHeuristic {
    /// Next to the nearest customer still routed.
    Distance,

    /// At the cheapest position, preferring routes with spare capacity.
    Cost,
}

impl From<InsertionKind> for InsertionHeuristic {
    fn from(kind: InsertionKind) -> Self {
        match kind {
            InsertionKind::Distance => InsertionHeuristic::Distance,
            InsertionKind::Cost => InsertionHeuristic::Cost,
        }
    }
}

impl InsertionHeuristic {
    /// Inserts an unrouted customer, opening a route if the solution has none.
    pub fn insert(self, instance: &Instance, solution: &mut Solution, customer: usize) {
        if solution.num_routes() == 0 {
            solution.push_route();
        }
        let point = match self {
            InsertionHeuristic::Distance => next_to_nearest(instance, solution, customer),
            InsertionHeuristic::Cost => None,
        }
        .or_else(|| cheapest_insertion(instance, solution, customer, true))
        .or_else(|| cheapest_insertion(instance, solution, customer, false));

        match point {
            Some(p) => solution.insert(instance, p.route, p.pos, customer),
            None => solution.insert(instance, 0, 0, customer),
        }
    }
}

// Before or after the nearest routed neighbor, whichever is cheaper.
fn next_to_nearest(
    instance: &Instance,
    solution: &Solution,
    customer: usize,
) -> Option<InsertionPoint> {
    instance.neighbors(customer).iter().find_map(|&n| {
        let (r, p) = solution.locate(n)?;
        let route = solution.route(r);
        let before = route.insertion_delta(instance, p, customer);
        let after = route.insertion_delta(instance, p + 1, customer);
        Some(if before <= after {
            InsertionPoint {
                route: r,
                pos: p,
                delta: before,
            }
        } else {
            InsertionPoint {
                route: r,
                pos: p + 1,
                delta: after,
            }
        })
    })
}

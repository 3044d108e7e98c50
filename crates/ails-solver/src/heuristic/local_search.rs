//! Granular local search.

use std::fmt::Debug;

use ails_core::{Instance, Solution};
use rand::seq::SliceRandom;

use super::IMPROVEMENT_EPS;
use crate::scope::SearchRng;

/// Drives a solution to a local optimum.
pub trait LocalSearch: Send + Debug {
    /// Improves `solution` in place; never increases its cost.
    ///
    /// With `full_pass` the search repeats until no move improves; otherwise a
    /// single sweep over the customers is made.
    fn improve(
        &mut self,
        instance: &Instance,
        solution: &mut Solution,
        full_pass: bool,
        rng: &mut SearchRng,
    );
}

/// First-improvement search over the nearest neighbors of each customer.
///
/// For a customer `c` and each of its `neighborhood_size` nearest customers
/// `n` it tries, in order: relocating `c` next to `n`, swapping `c` and `n`
/// (both across routes) and reversing the segment between them (same route).
/// Capacity is never violated, and a relocate never empties a route once the
/// solution is down to `min_number_routes` non-empty routes. Empty routes are
/// dropped at the end.
#[derive(Debug, Clone)]
pub struct GranularLocalSearch {
    neighborhood_size: usize,
    positions: Vec<Option<(usize, usize)>>,
    order: Vec<usize>,
}

impl GranularLocalSearch {
    pub fn new(neighborhood_size: usize) -> Self {
        Self {
            neighborhood_size: neighborhood_size.max(1),
            positions: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn neighborhood_size(&self) -> usize {
        self.neighborhood_size
    }

    fn try_moves(&self, instance: &Instance, solution: &mut Solution, c: usize, n: usize) -> bool {
        let (Some((ra, pa)), Some((rb, pb))) = (self.positions[c], self.positions[n]) else {
            return false;
        };
        if ra == rb {
            return try_reverse(instance, solution, ra, pa.min(pb), pa.max(pb));
        }
        try_relocate(instance, solution, (ra, pa), (rb, pb))
            || try_swap(instance, solution, (ra, pa), (rb, pb))
    }
}

impl LocalSearch for GranularLocalSearch {
    fn improve(
        &mut self,
        instance: &Instance,
        solution: &mut Solution,
        full_pass: bool,
        rng: &mut SearchRng,
    ) {
        self.positions.resize(instance.node_count(), None);
        solution.fill_positions(&mut self.positions);
        self.order.clear();
        self.order.extend(instance.customers());
        self.order.shuffle(rng);

        loop {
            let mut improved = false;
            for i in 0..self.order.len() {
                let c = self.order[i];
                for &n in instance.nearest(c, self.neighborhood_size) {
                    if self.try_moves(instance, solution, c, n) {
                        solution.fill_positions(&mut self.positions);
                        improved = true;
                    }
                }
            }
            if !improved || !full_pass {
                break;
            }
        }
        solution.remove_empty_routes();
    }
}

// Moves `a` next to `b` in b's route.
fn try_relocate(
    instance: &Instance,
    solution: &mut Solution,
    (ra, pa): (usize, usize),
    (rb, pb): (usize, usize),
) -> bool {
    let capacity = u64::from(instance.capacity());
    let customer = solution.route(ra).visits()[pa];
    if solution.route(ra).len() == 1
        && solution.non_empty_routes() <= instance.min_number_routes()
    {
        return false;
    }
    if solution.route(rb).load() + u64::from(instance.demand(customer)) > capacity {
        return false;
    }
    let saving = solution.route(ra).removal_delta(instance, pa);
    for pos in [pb, pb + 1] {
        let delta = saving + solution.route(rb).insertion_delta(instance, pos, customer);
        if delta < -IMPROVEMENT_EPS {
            solution.remove(instance, ra, pa);
            solution.insert(instance, rb, pos, customer);
            return true;
        }
    }
    false
}

// Exchanges `a` and `b` across routes.
fn try_swap(
    instance: &Instance,
    solution: &mut Solution,
    (ra, pa): (usize, usize),
    (rb, pb): (usize, usize),
) -> bool {
    let capacity = u64::from(instance.capacity());
    let route_a = solution.route(ra);
    let route_b = solution.route(rb);
    let a = route_a.visits()[pa];
    let b = route_b.visits()[pb];
    let (da, db) = (u64::from(instance.demand(a)), u64::from(instance.demand(b)));
    if route_a.load() - da + db > capacity || route_b.load() - db + da > capacity {
        return false;
    }
    let d = |x: usize, y: usize| instance.distance(x, y);
    let (prev_a, next_a) = (route_a.prev(pa), route_a.next(pa));
    let (prev_b, next_b) = (route_b.prev(pb), route_b.next(pb));
    let delta = d(prev_a, b) + d(b, next_a) - d(prev_a, a) - d(a, next_a) + d(prev_b, a)
        + d(a, next_b)
        - d(prev_b, b)
        - d(b, next_b);
    if delta < -IMPROVEMENT_EPS {
        solution.swap_between(instance, (ra, pa), (rb, pb));
        return true;
    }
    false
}

// Reverses the visits between positions `i <= j` of one route.
fn try_reverse(instance: &Instance, solution: &mut Solution, r: usize, i: usize, j: usize) -> bool {
    if i == j {
        return false;
    }
    let route = solution.route(r);
    let visits = route.visits();
    let d = |x: usize, y: usize| instance.distance(x, y);
    let (before, after) = (route.prev(i), route.next(j));
    let delta = d(before, visits[j]) + d(visits[i], after) - d(before, visits[i]) - d(visits[j], after);
    if delta < -IMPROVEMENT_EPS {
        solution.reverse_segment(instance, r, i, j);
        return true;
    }
    false
}

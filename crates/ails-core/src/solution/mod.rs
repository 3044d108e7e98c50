//! Mutable CVRP candidate solutions.
//!
//! Every mutating method refreshes the touched routes and the aggregate cost
//! `f` before returning, so readers never observe a stale cost.

mod record;
mod route;

#[cfg(test)]
mod tests;

pub use record::SolutionRecord;
pub use route::Route;

use crate::instance::{Instance, DEPOT};

/// A set of routes with its total routing cost.
///
/// Cloning is deep: no route storage is shared between clones. Use
/// [`Clone::clone_from`] to copy into an existing slot and reuse its buffers.
#[derive(Debug, Default)]
pub struct Solution {
    routes: Vec<Route>,
    f: f64,
}

impl Clone for Solution {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            f: self.f,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.routes.clone_from(&source.routes);
        self.f = source.f;
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.routes == other.routes
    }
}

impl Solution {
    /// Creates a solution with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solution from explicit visit sequences.
    pub fn with_routes(instance: &Instance, routes: Vec<Vec<usize>>) -> Self {
        let mut solution = Self::new();
        for visits in routes {
            let idx = solution.push_route();
            *solution.routes[idx].visits_mut() = visits;
            solution.routes[idx].refresh(instance);
        }
        solution.refresh_total();
        solution
    }

    /// Total routing cost.
    pub fn f(&self) -> f64 {
        self.f
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, idx: usize) -> &Route {
        &self.routes[idx]
    }

    /// Number of route slots, including empty ones.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn non_empty_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    pub fn customer_count(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Drops all routes and sets up `num_routes` empty ones.
    pub fn reset(&mut self, num_routes: usize) {
        self.routes.truncate(num_routes);
        for route in &mut self.routes {
            route.visits_mut().clear();
            route.refresh_empty();
        }
        while self.routes.len() < num_routes {
            self.routes.push(Route::new());
        }
        self.f = 0.0;
    }

    /// Removes every route.
    pub fn clear(&mut self) {
        self.reset(0);
    }

    /// Appends an empty route and returns its index.
    pub fn push_route(&mut self) -> usize {
        self.routes.push(Route::new());
        self.routes.len() - 1
    }

    /// Inserts `customer` before position `pos` of route `route`.
    pub fn insert(&mut self, instance: &Instance, route: usize, pos: usize, customer: usize) {
        self.routes[route].visits_mut().insert(pos, customer);
        self.touch(instance, route);
    }

    /// Removes and returns the customer at position `pos` of route `route`.
    pub fn remove(&mut self, instance: &Instance, route: usize, pos: usize) -> usize {
        let customer = self.routes[route].visits_mut().remove(pos);
        self.touch(instance, route);
        customer
    }

    /// Exchanges the visits at `a = (route, pos)` and `b = (route, pos)`.
    pub fn swap_between(&mut self, instance: &Instance, a: (usize, usize), b: (usize, usize)) {
        if a.0 == b.0 {
            self.routes[a.0].visits_mut().swap(a.1, b.1);
            self.touch(instance, a.0);
            return;
        }
        let ca = self.routes[a.0].visits()[a.1];
        let cb = self.routes[b.0].visits()[b.1];
        self.routes[a.0].visits_mut()[a.1] = cb;
        self.routes[b.0].visits_mut()[b.1] = ca;
        self.routes[a.0].refresh(instance);
        self.touch(instance, b.0);
    }

    /// Reverses the visits between positions `from` and `to`, inclusive.
    pub fn reverse_segment(&mut self, instance: &Instance, route: usize, from: usize, to: usize) {
        self.routes[route].visits_mut()[from..=to].reverse();
        self.touch(instance, route);
    }

    /// Replaces the visits of a route wholesale.
    pub fn set_route(&mut self, instance: &Instance, route: usize, visits: &[usize]) {
        let slot = self.routes[route].visits_mut();
        slot.clear();
        slot.extend_from_slice(visits);
        self.touch(instance, route);
    }

    /// Removes routes without visits, preserving the order of the others.
    pub fn remove_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }

    /// Every route respects the vehicle capacity.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        let capacity = u64::from(instance.capacity());
        self.routes.iter().all(|r| r.load() <= capacity)
    }

    /// Sum of load above capacity over all routes.
    pub fn excess_load(&self, instance: &Instance) -> u64 {
        let capacity = u64::from(instance.capacity());
        self.routes
            .iter()
            .map(|r| r.load().saturating_sub(capacity))
            .sum()
    }

    /// Every customer appears exactly once and the depot never appears inside
    /// a route.
    pub fn is_complete(&self, instance: &Instance) -> bool {
        let mut seen = vec![false; instance.node_count()];
        for route in &self.routes {
            for &c in route.visits() {
                if c == DEPOT || c >= seen.len() || seen[c] {
                    return false;
                }
                seen[c] = true;
            }
        }
        seen.iter().skip(1).all(|&s| s)
    }

    /// Position `(route, pos)` of a customer.
    pub fn locate(&self, customer: usize) -> Option<(usize, usize)> {
        self.routes.iter().enumerate().find_map(|(r, route)| {
            route
                .visits()
                .iter()
                .position(|&c| c == customer)
                .map(|p| (r, p))
        })
    }

    /// Positions of every node, indexed by node; `None` for unrouted nodes.
    pub fn positions(&self, instance: &Instance) -> Vec<Option<(usize, usize)>> {
        let mut out = vec![None; instance.node_count()];
        self.fill_positions(&mut out);
        out
    }

    /// Writes the position of every routed customer into `out`.
    pub fn fill_positions(&self, out: &mut [Option<(usize, usize)>]) {
        out.iter_mut().for_each(|p| *p = None);
        for (r, route) in self.routes.iter().enumerate() {
            for (p, &c) in route.visits().iter().enumerate() {
                if let Some(slot) = out.get_mut(c) {
                    *slot = Some((r, p));
                }
            }
        }
    }

    /// Recomputes every route and the total cost from scratch.
    pub fn recompute(&mut self, instance: &Instance) {
        for route in &mut self.routes {
            route.refresh(instance);
        }
        self.refresh_total();
    }

    /// Borrows this solution as a printable artifact.
    pub fn record(&self, time_secs: f64) -> SolutionRecord<'_> {
        SolutionRecord::new(self, self.f, time_secs)
    }

    fn touch(&mut self, instance: &Instance, route: usize) {
        self.routes[route].refresh(instance);
        self.refresh_total();
    }

    fn refresh_total(&mut self) {
        self.f = self.routes.iter().map(Route::cost).sum();
    }
}

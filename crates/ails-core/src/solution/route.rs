//! A single vehicle route.

use crate::instance::{Instance, DEPOT};

/// Ordered customer visits of one vehicle. The depot is implicit at both ends.
///
/// Load and cost are maintained by [`Solution`](super::Solution); a route is
/// never mutated on its own.
#[derive(Debug, Default, PartialEq)]
pub struct Route {
    visits: Vec<usize>,
    load: u64,
    cost: f64,
}

impl Clone for Route {
    fn clone(&self) -> Self {
        Self {
            visits: self.visits.clone(),
            load: self.load,
            cost: self.cost,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.visits.clone_from(&source.visits);
        self.load = source.load;
        self.cost = source.cost;
    }
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn load(&self) -> u64 {
        self.load
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn contains(&self, customer: usize) -> bool {
        self.visits.contains(&customer)
    }

    /// Node visited before position `pos` (the depot for the first visit).
    pub fn prev(&self, pos: usize) -> usize {
        if pos == 0 {
            DEPOT
        } else {
            self.visits[pos - 1]
        }
    }

    /// Node visited after position `pos` (the depot for the last visit).
    pub fn next(&self, pos: usize) -> usize {
        self.visits.get(pos + 1).copied().unwrap_or(DEPOT)
    }

    /// Extra distance of inserting `customer` before position `pos`.
    pub fn insertion_delta(&self, instance: &Instance, pos: usize, customer: usize) -> f64 {
        let before = self.prev(pos);
        let after = self.visits.get(pos).copied().unwrap_or(DEPOT);
        instance.distance(before, customer) + instance.distance(customer, after)
            - instance.distance(before, after)
    }

    /// Distance saved by removing the visit at position `pos`.
    pub fn removal_delta(&self, instance: &Instance, pos: usize) -> f64 {
        let before = self.prev(pos);
        let after = self.next(pos);
        let customer = self.visits[pos];
        instance.distance(before, after)
            - instance.distance(before, customer)
            - instance.distance(customer, after)
    }

    /// Centroid of the visited customers, or the depot for an empty route.
    pub fn centroid(&self, instance: &Instance) -> crate::Point {
        if self.visits.is_empty() {
            return instance.point(DEPOT);
        }
        let (sx, sy) = self.visits.iter().fold((0.0, 0.0), |(sx, sy), &c| {
            let p = instance.point(c);
            (sx + p.x, sy + p.y)
        });
        let n = self.visits.len() as f64;
        crate::Point::new(sx / n, sy / n)
    }

    pub(super) fn visits_mut(&mut self) -> &mut Vec<usize> {
        &mut self.visits
    }

    pub(super) fn refresh_empty(&mut self) {
        self.cost = 0.0;
        self.load = 0;
    }

    pub(super) fn refresh(&mut self, instance: &Instance) {
        let mut cost = 0.0;
        let mut load = 0u64;
        let mut last = DEPOT;
        for &c in &self.visits {
            cost += instance.distance(last, c);
            load += u64::from(instance.demand(c));
            last = c;
        }
        if !self.visits.is_empty() {
            cost += instance.distance(last, DEPOT);
        }
        self.cost = cost;
        self.load = load;
    }
}

//! Immutable CVRP problem data.
//!
//! Node `0` is always the depot; customers occupy `1..=size()`. Pairwise
//! distances and per-node neighbor lists are computed once at build time.

mod builder;

#[cfg(test)]
mod tests;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use builder::InstanceBuilder;

/// Index of the depot node.
pub const DEPOT: usize = 0;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Polar angle of `self` seen from `origin`, in `(-pi, pi]`.
    pub fn angle_from(&self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }
}

/// How the distance between two nodes is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceMetric {
    /// Plain Euclidean distance.
    #[default]
    Euclidean,

    /// Euclidean distance rounded to the nearest integer (TSPLIB `nint`).
    RoundedEuclidean,
}

impl DistanceMetric {
    /// Measures the distance between two points.
    pub fn measure(self, a: Point, b: Point) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        let d = (dx * dx + dy * dy).sqrt();
        match self {
            DistanceMetric::Euclidean => d,
            DistanceMetric::RoundedEuclidean => (d + 0.5).floor(),
        }
    }
}

/// CVRP instance: a depot, customers with demands, and a vehicle capacity.
///
/// Read-only once built; the search engine borrows it for its whole lifetime.
#[derive(Clone)]
pub struct Instance {
    name: String,
    points: Vec<Point>,
    demands: Vec<u32>,
    capacity: u32,
    total_demand: u64,
    min_number_routes: usize,
    metric: DistanceMetric,
    distances: Vec<f64>,
    neighbors: Vec<Vec<usize>>,
}

impl Instance {
    /// Starts building an instance with the given name.
    pub fn builder(name: impl Into<String>) -> InstanceBuilder {
        InstanceBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of customers (the depot is not counted).
    pub fn size(&self) -> usize {
        self.points.len() - 1
    }

    /// Number of nodes including the depot.
    pub fn node_count(&self) -> usize {
        self.points.len()
    }

    /// Iterates over customer node indices.
    pub fn customers(&self) -> impl Iterator<Item = usize> {
        1..self.points.len()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn demand(&self, node: usize) -> u32 {
        self.demands[node]
    }

    pub fn total_demand(&self) -> u64 {
        self.total_demand
    }

    pub fn point(&self, node: usize) -> Point {
        self.points[node]
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Lower bound on the number of routes a feasible solution needs.
    pub fn min_number_routes(&self) -> usize {
        self.min_number_routes
    }

    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.points.len() + to]
    }

    /// Customers ordered by increasing distance from `node`, excluding `node`
    /// itself and the depot.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    /// The `k` nearest customers of `node`.
    pub fn nearest(&self, node: usize, k: usize) -> &[usize] {
        let list = &self.neighbors[node];
        &list[..k.min(list.len())]
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("customers", &self.size())
            .field("capacity", &self.capacity)
            .field("total_demand", &self.total_demand)
            .field("min_number_routes", &self.min_number_routes)
            .field("metric", &self.metric)
            .finish()
    }
}

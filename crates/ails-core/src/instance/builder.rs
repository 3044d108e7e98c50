//! Fluent construction and validation of [`Instance`] values.

use crate::error::{AilsError, Result};

use super::{DistanceMetric, Instance, Point, DEPOT};

/// Builder for [`Instance`].
///
/// # Example
///
/// ```
/// use ails_core::{Instance, Point};
///
/// let instance = Instance::builder("tiny")
///     .depot(Point::new(0.0, 0.0))
///     .customer(Point::new(3.0, 4.0), 5)
///     .customer(Point::new(-3.0, 4.0), 5)
///     .capacity(10)
///     .build()
///     .unwrap();
///
/// assert_eq!(instance.size(), 2);
/// assert_eq!(instance.distance(0, 1), 5.0);
/// assert_eq!(instance.min_number_routes(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    name: String,
    depot: Point,
    customers: Vec<(Point, u32)>,
    capacity: Option<u32>,
    metric: DistanceMetric,
    min_number_routes: Option<usize>,
}

impl InstanceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depot: Point::default(),
            customers: Vec::new(),
            capacity: None,
            metric: DistanceMetric::default(),
            min_number_routes: None,
        }
    }

    pub fn depot(mut self, point: Point) -> Self {
        self.depot = point;
        self
    }

    /// Adds a customer; customers are numbered `1..` in insertion order.
    pub fn customer(mut self, point: Point, demand: u32) -> Self {
        self.customers.push((point, demand));
        self
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Overrides the `ceil(total demand / capacity)` lower bound.
    pub fn min_number_routes(mut self, routes: usize) -> Self {
        self.min_number_routes = Some(routes);
        self
    }

    /// Validates the data and precomputes distances and neighbor lists.
    ///
    /// # Errors
    ///
    /// Returns [`AilsError::Instance`] when there are no customers, the
    /// capacity is missing or zero, or a single demand exceeds the capacity.
    pub fn build(self) -> Result<Instance> {
        let capacity = match self.capacity {
            Some(c) if c > 0 => c,
            Some(_) => return Err(AilsError::Instance("capacity must be positive".into())),
            None => return Err(AilsError::Instance("capacity is required".into())),
        };
        if self.customers.is_empty() {
            return Err(AilsError::Instance(format!(
                "instance '{}' has no customers",
                self.name
            )));
        }
        if let Some((idx, (_, demand))) = self
            .customers
            .iter()
            .enumerate()
            .find(|(_, (_, d))| *d > capacity)
        {
            return Err(AilsError::Instance(format!(
                "customer {} demands {} which exceeds capacity {}",
                idx + 1,
                demand,
                capacity
            )));
        }

        let mut points = Vec::with_capacity(self.customers.len() + 1);
        let mut demands = Vec::with_capacity(self.customers.len() + 1);
        points.push(self.depot);
        demands.push(0);
        for (point, demand) in &self.customers {
            points.push(*point);
            demands.push(*demand);
        }

        let total_demand: u64 = demands.iter().map(|&d| u64::from(d)).sum();
        let lower_bound = total_demand.div_ceil(u64::from(capacity)).max(1) as usize;
        let min_number_routes = match self.min_number_routes {
            Some(0) => {
                return Err(AilsError::Instance(
                    "minimum number of routes must be positive".into(),
                ))
            }
            Some(n) => n.max(lower_bound),
            None => lower_bound,
        };

        let n = points.len();
        let mut distances = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.metric.measure(points[i], points[j]);
                distances[i * n + j] = d;
                distances[j * n + i] = d;
            }
        }

        let neighbors = (0..n)
            .map(|i| {
                let mut list: Vec<usize> = (1..n).filter(|&j| j != i && j != DEPOT).collect();
                list.sort_by(|&a, &b| {
                    distances[i * n + a]
                        .total_cmp(&distances[i * n + b])
                        .then(a.cmp(&b))
                });
                list
            })
            .collect();

        Ok(Instance {
            name: self.name,
            points,
            demands,
            capacity,
            total_demand,
            min_number_routes,
            metric: self.metric,
            distances,
            neighbors,
        })
    }
}

//! Pairwise solution distance.

use std::cmp::Ordering;
use std::fmt::Debug;

use ails_core::{Solution, DEPOT};

/// Structural distance between two solutions.
pub trait SolutionDistance: Send + Debug {
    /// Symmetric, non-negative, zero for structurally identical solutions.
    fn distance(&mut self, a: &Solution, b: &Solution) -> f64;
}

/// Broken-edge distance.
///
/// Half the size of the symmetric difference of the two undirected edge
/// multisets, depot edges included. Route order and travel direction are
/// irrelevant.
///
/// # Example
///
/// ```
/// use ails_core::{Instance, Point, Solution};
/// use ails_solver::heuristic::{EdgeDistance, SolutionDistance};
///
/// let instance = Instance::builder("line")
///     .depot(Point::new(0.0, 0.0))
///     .customer(Point::new(1.0, 0.0), 1)
///     .customer(Point::new(2.0, 0.0), 1)
///     .capacity(10)
///     .build()
///     .unwrap();
/// let joined = Solution::with_routes(&instance, vec![vec![1, 2]]);
/// let reversed = Solution::with_routes(&instance, vec![vec![2, 1]]);
/// let split = Solution::with_routes(&instance, vec![vec![1], vec![2]]);
///
/// let mut distance = EdgeDistance::new();
/// assert_eq!(distance.distance(&joined, &reversed), 0.0);
/// assert!(distance.distance(&joined, &split) > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EdgeDistance {
    left: Vec<(usize, usize)>,
    right: Vec<(usize, usize)>,
}

impl EdgeDistance {
    pub fn new() -> Self {
        Self::default()
    }
}

fn collect_edges(solution: &Solution, out: &mut Vec<(usize, usize)>) {
    out.clear();
    for route in solution.routes().iter().filter(|r| !r.is_empty()) {
        let mut last = DEPOT;
        for &c in route.visits() {
            out.push((last.min(c), last.max(c)));
            last = c;
        }
        out.push((DEPOT, last));
    }
    out.sort_unstable();
}

impl SolutionDistance for EdgeDistance {
    fn distance(&mut self, a: &Solution, b: &Solution) -> f64 {
        collect_edges(a, &mut self.left);
        collect_edges(b, &mut self.right);

        let (mut i, mut j, mut shared) = (0, 0, 0usize);
        while i < self.left.len() && j < self.right.len() {
            match self.left[i].cmp(&self.right[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        let different = self.left.len() + self.right.len() - 2 * shared;
        different as f64 / 2.0
    }
}

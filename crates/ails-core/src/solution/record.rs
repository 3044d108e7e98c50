//! Plain-text solution artifact.

use std::fmt;

use super::Solution;

/// Printable solution record.
///
/// One line per non-empty route as `Route #<k>: <ids>`, then `Cost <value>`
/// and `Time <value>`, both with four fractional digits. Rust formatting is
/// locale independent, so the decimal separator is always `.`.
///
/// # Example
///
/// ```
/// use ails_core::{Instance, Point, Solution};
///
/// let instance = Instance::builder("pair")
///     .customer(Point::new(3.0, 4.0), 1)
///     .customer(Point::new(-3.0, 4.0), 1)
///     .capacity(1)
///     .build()
///     .unwrap();
/// let solution = Solution::with_routes(&instance, vec![vec![1], vec![2]]);
///
/// assert_eq!(
///     solution.record(1.5).to_string(),
///     "Route #1: 1\nRoute #2: 2\nCost 20.0000\nTime 1.5000"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionRecord<'a> {
    solution: &'a Solution,
    cost: f64,
    time_secs: f64,
}

impl<'a> SolutionRecord<'a> {
    pub fn new(solution: &'a Solution, cost: f64, time_secs: f64) -> Self {
        Self {
            solution,
            cost,
            time_secs,
        }
    }
}

impl fmt::Display for SolutionRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes = self.solution.routes().iter().filter(|r| !r.is_empty());
        for (k, route) in routes.enumerate() {
            write!(f, "Route #{}:", k + 1)?;
            for c in route.visits() {
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Cost {:.4}", self.cost)?;
        write!(f, "Time {:.4}", self.time_secs)
    }
}

//! Convergence statistics of a search run.

use serde::Serialize;

/// Counters describing how fast a run converged.
///
/// The ratios are undefined for a run without iterations (or without
/// measurable time) and come back as `None` in that case.
///
/// # Example
///
/// ```
/// use ails_solver::stats::ConvergenceMetrics;
///
/// let metrics = ConvergenceMetrics {
///     iterations: 200,
///     iteration_of_best: 50,
///     time_of_best: 0.5,
///     total_time: 2.0,
/// };
/// assert_eq!(metrics.convergence_iteration(), Some(0.25));
/// assert_eq!(metrics.convergence_time(), Some(0.25));
/// assert_eq!(metrics.time_per_iteration(), Some(0.01));
///
/// let idle = ConvergenceMetrics::default();
/// assert_eq!(idle.time_per_iteration(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ConvergenceMetrics {
    /// Perturbation iterations performed.
    pub iterations: u64,
    /// Iteration of the last improvement of the best solution.
    pub iteration_of_best: u64,
    /// Elapsed seconds at the last improvement.
    pub time_of_best: f64,
    /// Total running time in seconds.
    pub total_time: f64,
}

impl ConvergenceMetrics {
    /// Average seconds per iteration.
    pub fn time_per_iteration(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.total_time / self.iterations as f64)
    }

    /// Fraction of the iterations spent before the last improvement.
    pub fn convergence_iteration(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.iteration_of_best as f64 / self.iterations as f64)
    }

    /// Fraction of the running time spent before the last improvement.
    pub fn convergence_time(&self) -> Option<f64> {
        (self.total_time > 0.0).then(|| self.time_of_best / self.total_time)
    }
}

/// Relative gap of `cost` to a known optimum, in percent.
///
/// `None` when the optimum is not positive.
pub fn gap(cost: f64, optimal: f64) -> Option<f64> {
    (optimal > 0.0).then(|| 100.0 * (cost - optimal) / optimal)
}

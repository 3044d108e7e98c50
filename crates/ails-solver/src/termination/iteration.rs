//! Iteration count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once `limit` perturbation iterations have completed.
///
/// # Example
///
/// ```
/// use ails_solver::termination::IterationTermination;
///
/// let term = IterationTermination::new(1000);
/// assert_eq!(term.limit(), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct IterationTermination {
    limit: u64,
}

impl IterationTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Termination for IterationTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.iteration() >= self.limit
    }

    fn progress(&self, scope: &SearchScope) -> Option<f64> {
        if self.limit == 0 {
            return Some(1.0);
        }
        Some((scope.iteration() as f64 / self.limit as f64).clamp(0.0, 1.0))
    }
}

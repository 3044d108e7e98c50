//! Time-based termination.

use std::time::Duration;

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once the engine clock has run past a limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ails_solver::termination::TimeTermination;
///
/// let term = TimeTermination::new(Duration::from_secs(30));
/// let term = TimeTermination::seconds(2.5);
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Limits beyond what a `Duration` holds are treated as unbounded.
    pub fn seconds(secs: f64) -> Self {
        Self::new(Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX))
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.elapsed() > self.limit.as_secs_f64()
    }

    fn progress(&self, scope: &SearchScope) -> Option<f64> {
        let limit = self.limit.as_secs_f64();
        if limit <= 0.0 {
            return Some(1.0);
        }
        Some((scope.elapsed() / limit).clamp(0.0, 1.0))
    }
}

//! Known-optimum termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once the best cost reaches a known optimum.
///
/// Without an optimum the condition never holds.
#[derive(Debug, Clone)]
pub struct OptimalCostTermination {
    optimal: Option<f64>,
}

impl OptimalCostTermination {
    pub fn new(optimal: Option<f64>) -> Self {
        Self { optimal }
    }

    pub fn optimal(&self) -> Option<f64> {
        self.optimal
    }
}

impl Termination for OptimalCostTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.optimal.is_some_and(|optimal| scope.best_f() <= optimal)
    }
}

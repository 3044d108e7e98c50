//! Stopping criteria for the search loop.
//!
//! Terminations are checked at iteration boundaries only; an iteration in
//! flight always runs to completion.

mod composite;
mod iteration;
mod optimal;
mod time;

use std::fmt::Debug;

use ails_config::{StopCriterionKind, TerminationConfig};

use crate::scope::SearchScope;

pub use composite::OrTermination;
pub use iteration::IterationTermination;
pub use optimal::OptimalCostTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if the search should stop.
    fn is_terminated(&self, scope: &SearchScope) -> bool;

    /// Fraction of the budget used so far, in `[0, 1]`.
    ///
    /// `None` for terminations without a budget.
    fn progress(&self, _scope: &SearchScope) -> Option<f64> {
        None
    }
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }

    fn progress(&self, scope: &SearchScope) -> Option<f64> {
        (**self).progress(scope)
    }
}

/// Budget (iterations or time) OR known optimum reached.
///
/// # Example
///
/// ```
/// use ails_config::SearchConfig;
/// use ails_solver::termination::StoppingCriterion;
///
/// let config = SearchConfig::new().with_iteration_limit(200).with_optimal(784.0);
/// let criterion = StoppingCriterion::from_config(&config.termination);
/// assert_eq!(criterion.optimal(), Some(784.0));
/// ```
#[derive(Debug)]
pub struct StoppingCriterion {
    inner: OrTermination<(Box<dyn Termination>, OptimalCostTermination)>,
}

impl StoppingCriterion {
    pub fn new(budget: Box<dyn Termination>, optimal: Option<f64>) -> Self {
        Self {
            inner: OrTermination::new((budget, OptimalCostTermination::new(optimal))),
        }
    }

    pub fn from_config(config: &TerminationConfig) -> Self {
        let budget: Box<dyn Termination> = match config.criterion {
            StopCriterionKind::Iteration => {
                Box::new(IterationTermination::new(config.limit.ceil() as u64))
            }
            StopCriterionKind::Time => Box::new(TimeTermination::seconds(config.limit)),
        };
        Self::new(budget, config.optimal)
    }

    /// Known optimal cost, if any.
    pub fn optimal(&self) -> Option<f64> {
        (self.inner.0).1.optimal()
    }
}

impl Termination for StoppingCriterion {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.inner.is_terminated(scope)
    }

    fn progress(&self, scope: &SearchScope) -> Option<f64> {
        self.inner.progress(scope)
    }
}

//! Acceptance criteria for perturbed-and-improved candidates.
//!
//! The engine consults a criterion only on non-forced iterations. Every
//! candidate is reported through [`AcceptanceCriterion::record`] first, so
//! stateful criteria see all local optima, forced ones included.

mod threshold;

use std::fmt::Debug;

use ails_config::AcceptanceConfig;
use ails_core::Solution;

pub use threshold::ThresholdAcceptance;

/// Decides whether a candidate replaces the reference solution.
pub trait AcceptanceCriterion: Send + Debug {
    /// Observes a new local optimum. `progress` is the search progress in
    /// `[0, 1]`.
    fn record(&mut self, _candidate: &Solution, _progress: f64) {}

    /// Returns true if `candidate` should become the new reference.
    fn accept(&self, candidate: &Solution, reference: &Solution) -> bool;
}

/// Accepts candidates whose cost does not exceed the reference cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BetterThanReference;

impl AcceptanceCriterion for BetterThanReference {
    fn accept(&self, candidate: &Solution, reference: &Solution) -> bool {
        candidate.f() <= reference.f()
    }
}

/// Accepts every candidate (random walk).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl AcceptanceCriterion for AcceptAll {
    fn accept(&self, _candidate: &Solution, _reference: &Solution) -> bool {
        true
    }
}

/// Builds the configured criterion. `window` is the threshold history
/// length (gamma).
pub fn build_acceptance(config: &AcceptanceConfig, window: usize) -> Box<dyn AcceptanceCriterion> {
    match *config {
        AcceptanceConfig::Threshold { eta_max, eta_min } => {
            Box::new(ThresholdAcceptance::new(window, eta_max, eta_min))
        }
        AcceptanceConfig::BetterThanReference => Box::new(BetterThanReference),
        AcceptanceConfig::AcceptAll => Box::new(AcceptAll),
    }
}

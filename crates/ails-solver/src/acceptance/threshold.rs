//! Threshold acceptance over recent local optima.

use std::collections::VecDeque;

use ails_core::Solution;

use super::AcceptanceCriterion;

/// Accepts candidates below a threshold set between the best and the mean
/// cost of the last `window` local optima.
///
/// The threshold is `min + η·(mean − min)`, with η annealed geometrically
/// from `eta_max` at the start of the search to `eta_min` at the end. Before
/// any optimum is recorded it behaves like
/// [`BetterThanReference`](super::BetterThanReference).
///
/// # Example
///
/// ```
/// use ails_solver::acceptance::ThresholdAcceptance;
///
/// let acceptance = ThresholdAcceptance::new(30, 1.0, 0.01);
/// assert_eq!(acceptance.eta(0.0), 1.0);
/// assert!((acceptance.eta(1.0) - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdAcceptance {
    window: usize,
    eta_max: f64,
    eta_min: f64,
    history: VecDeque<f64>,
    threshold: Option<f64>,
}

impl ThresholdAcceptance {
    pub fn new(window: usize, eta_max: f64, eta_min: f64) -> Self {
        let window = window.max(1);
        Self {
            window,
            eta_max,
            eta_min,
            history: VecDeque::with_capacity(window),
            threshold: None,
        }
    }

    /// η at `progress`, clamped to `[0, 1]`.
    pub fn eta(&self, progress: f64) -> f64 {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.eta_max * (self.eta_min / self.eta_max).powf(p)
    }

    /// Current threshold, `None` before the first recorded optimum.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl AcceptanceCriterion for ThresholdAcceptance {
    fn record(&mut self, candidate: &Solution, progress: f64) {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(candidate.f());

        let min = self.history.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = self.history.iter().sum::<f64>() / self.history.len() as f64;
        self.threshold = Some(min + self.eta(progress) * (mean - min));
    }

    fn accept(&self, candidate: &Solution, reference: &Solution) -> bool {
        match self.threshold {
            Some(threshold) => candidate.f() <= threshold,
            None => candidate.f() <= reference.f(),
        }
    }
}

//! Per-operator intensity state.

use std::fmt;

use ails_config::{OmegaRule, PerturbationKind};
use serde::Serialize;

/// Identifies an omega state: one per operator and route count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OmegaKey {
    pub kind: PerturbationKind,
    pub routes: usize,
}

impl OmegaKey {
    pub fn new(kind: PerturbationKind, routes: usize) -> Self {
        Self { kind, routes }
    }
}

impl fmt::Display for OmegaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.routes)
    }
}

/// Outcome of one adjustment round for a single state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OmegaAdjustment {
    pub key: OmegaKey,
    pub mean_distance: f64,
    pub ideal_distance: f64,
    pub old_omega: f64,
    pub new_omega: f64,
}

/// Adjustable perturbation intensity with bounds and a distance accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct OmegaState {
    omega: f64,
    min: f64,
    max: f64,
    sum: f64,
    count: u32,
    adjustments: u32,
}

impl OmegaState {
    /// Creates a state with `initial` clamped into `[min, max]`.
    pub fn new(initial: f64, min: f64, max: f64) -> Self {
        let max = max.max(min);
        Self {
            omega: initial.clamp(min, max),
            min,
            max,
            sum: 0.0,
            count: 0,
            adjustments: 0,
        }
    }

    /// Current intensity.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Number of distances recorded since the last adjustment.
    pub fn pending(&self) -> u32 {
        self.count
    }

    /// Number of adjustment rounds applied so far.
    pub fn adjustments(&self) -> u32 {
        self.adjustments
    }

    /// Records the distance produced by one application of the operator.
    pub fn push_distance(&mut self, distance: f64) {
        self.sum += distance;
        self.count += 1;
    }

    /// Mean distance since the last adjustment.
    pub fn mean_distance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }

    /// Moves omega towards producing `ideal` and resets the accumulator.
    ///
    /// Returns `(old, new)` omega, or `None` when no distance was recorded.
    pub fn adjust(&mut self, ideal: f64, rule: OmegaRule) -> Option<(f64, f64)> {
        let mean = self.mean_distance()?;
        let old = self.omega;
        let target = match rule {
            OmegaRule::FixedStep { step } => {
                if mean > ideal {
                    old - step
                } else if mean < ideal {
                    old + step
                } else {
                    old
                }
            }
            OmegaRule::Proportional => {
                if mean > 0.0 {
                    old * ideal / mean
                } else {
                    self.max
                }
            }
        };
        self.omega = target.clamp(self.min, self.max);
        self.sum = 0.0;
        self.count = 0;
        self.adjustments += 1;
        Some((old, self.omega))
    }
}

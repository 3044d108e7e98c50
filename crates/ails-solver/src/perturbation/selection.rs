//! Per-iteration operator selection.

use ails_config::{PerturbationKind, SelectionConfig};
use ails_core::{AilsError, Result};
use rand::Rng;
use serde::Serialize;

use crate::scope::SearchRng;

/// The operator chosen for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Portfolio index.
    pub index: usize,
    /// The result is accepted without consulting the acceptance criterion.
    pub forced: bool,
}

/// How the portfolio picks an operator each iteration.
///
/// A function of the iteration number, the configuration and the search
/// random source only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Uniformly random over all operators.
    UniformRandom,

    /// Always the operator at this index.
    FixedIndex(usize),

    /// Every `period` iterations the `forced` operator with forced
    /// acceptance, otherwise uniformly random over `others`.
    PeriodicForced {
        forced: usize,
        period: u64,
        others: Vec<usize>,
    },
}

impl SelectionPolicy {
    /// Resolves a configured policy against the portfolio order.
    ///
    /// # Errors
    ///
    /// [`AilsError::Config`] for an out-of-range index, a forced operator that
    /// is not in the portfolio, or one that leaves no other operator.
    pub fn from_config(config: &SelectionConfig, kinds: &[PerturbationKind]) -> Result<Self> {
        match *config {
            SelectionConfig::UniformRandom => Ok(SelectionPolicy::UniformRandom),
            SelectionConfig::FixedIndex { index } => {
                if index >= kinds.len() {
                    return Err(AilsError::Config(format!(
                        "fixed_index {} out of range for {} operators",
                        index,
                        kinds.len()
                    )));
                }
                Ok(SelectionPolicy::FixedIndex(index))
            }
            SelectionConfig::PeriodicForced { operator, period } => {
                Self::periodic_forced(kinds, operator, period)
            }
        }
    }

    /// Periodic forcing of the operator identified by `operator`.
    ///
    /// Every portfolio entry of that kind is excluded from regular iterations,
    /// wherever it sits in the portfolio.
    pub fn periodic_forced(
        kinds: &[PerturbationKind],
        operator: PerturbationKind,
        period: u64,
    ) -> Result<Self> {
        let forced = kinds.iter().position(|k| *k == operator).ok_or_else(|| {
            AilsError::Config(format!(
                "forced operator '{operator}' is not in the perturbation portfolio"
            ))
        })?;
        let others: Vec<usize> = kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k != operator)
            .map(|(i, _)| i)
            .collect();
        if others.is_empty() {
            return Err(AilsError::Config(format!(
                "forced operator '{operator}' leaves no operator for regular iterations"
            )));
        }
        Ok(SelectionPolicy::PeriodicForced {
            forced,
            period,
            others,
        })
    }

    /// Whether `iteration` (1-based) is a forced iteration.
    pub fn is_forced_iteration(&self, iteration: u64) -> bool {
        match self {
            SelectionPolicy::PeriodicForced { period, .. } => {
                *period > 0 && iteration % *period == 0
            }
            _ => false,
        }
    }

    /// Picks the operator for `iteration` out of `len`.
    pub fn select(&self, iteration: u64, len: usize, rng: &mut SearchRng) -> Selection {
        match self {
            SelectionPolicy::UniformRandom => Selection {
                index: rng.random_range(0..len),
                forced: false,
            },
            SelectionPolicy::FixedIndex(index) => Selection {
                index: *index,
                forced: false,
            },
            SelectionPolicy::PeriodicForced { forced, others, .. } => {
                if self.is_forced_iteration(iteration) {
                    Selection {
                        index: *forced,
                        forced: true,
                    }
                } else {
                    Selection {
                        index: others[rng.random_range(0..others.len())],
                        forced: false,
                    }
                }
            }
        }
    }
}

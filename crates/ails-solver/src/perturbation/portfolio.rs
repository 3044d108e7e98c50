//! Ordered operator portfolio.

use ails_config::{PerturbationKind, SearchConfig};
use ails_core::{AilsError, Result};

use super::{Perturbation, PerturbationRegistry, PerturbationSettings, Selection, SelectionPolicy};
use crate::scope::SearchRng;

/// The operators of a search and the policy choosing among them.
#[derive(Debug)]
pub struct PerturbationPortfolio {
    operators: Vec<Box<dyn Perturbation>>,
    policy: SelectionPolicy,
}

impl PerturbationPortfolio {
    /// Checks that `policy` only refers to existing operators.
    pub fn new(operators: Vec<Box<dyn Perturbation>>, policy: SelectionPolicy) -> Result<Self> {
        if operators.is_empty() {
            return Err(AilsError::Config("perturbation portfolio is empty".into()));
        }
        let len = operators.len();
        let in_range = match &policy {
            SelectionPolicy::UniformRandom => true,
            SelectionPolicy::FixedIndex(index) => *index < len,
            SelectionPolicy::PeriodicForced { forced, others, .. } => {
                *forced < len && !others.is_empty() && others.iter().all(|&i| i < len && i != *forced)
            }
        };
        if !in_range {
            return Err(AilsError::Config(format!(
                "selection policy {:?} does not fit a portfolio of {} operators",
                policy, len
            )));
        }
        Ok(Self { operators, policy })
    }

    /// Builds the configured portfolio through `registry`.
    pub fn from_config(config: &SearchConfig, registry: &PerturbationRegistry) -> Result<Self> {
        let operators = registry.build(
            &config.perturbations,
            &PerturbationSettings::from_config(config),
        )?;
        let policy = SelectionPolicy::from_config(&config.selection, &config.perturbations)?;
        Self::new(operators, policy)
    }

    /// Picks the operator for `iteration`.
    pub fn select(&self, iteration: u64, rng: &mut SearchRng) -> Selection {
        self.policy.select(iteration, self.operators.len(), rng)
    }

    pub fn operator(&self, index: usize) -> &dyn Perturbation {
        self.operators[index].as_ref()
    }

    pub fn operator_mut(&mut self, index: usize) -> &mut dyn Perturbation {
        self.operators[index].as_mut()
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn kinds(&self) -> Vec<PerturbationKind> {
        self.operators.iter().map(|op| op.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

//! Operator registry.
//!
//! Maps operator identifiers to factories so the portfolio is assembled, and
//! validated, once when the engine is built.

use std::collections::BTreeMap;
use std::fmt;

use ails_config::{PerturbationKind, SearchConfig};
use ails_core::{AilsError, Result};

use super::{ConcentricRemoval, Decomposition, Perturbation, SequentialRemoval};
use crate::heuristic::InsertionHeuristic;

/// Parameters shared by every operator factory.
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationSettings {
    pub insertion: Vec<InsertionHeuristic>,
    pub decomposition_routes: usize,
}

impl PerturbationSettings {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            insertion: config.insertion.iter().copied().map(Into::into).collect(),
            decomposition_routes: config.decomposition.routes,
        }
    }
}

impl Default for PerturbationSettings {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

/// Builds one operator instance.
pub type PerturbationFactory =
    Box<dyn Fn(&PerturbationSettings) -> Box<dyn Perturbation> + Send + Sync>;

/// Registry of operator factories keyed by [`PerturbationKind`].
///
/// # Example
///
/// ```
/// use ails_config::PerturbationKind;
/// use ails_solver::perturbation::{PerturbationRegistry, PerturbationSettings};
///
/// let registry = PerturbationRegistry::default();
/// let operators = registry
///     .build(
///         &[PerturbationKind::Concentric, PerturbationKind::Decomposition],
///         &PerturbationSettings::default(),
///     )
///     .unwrap();
/// assert_eq!(operators[0].kind(), PerturbationKind::Concentric);
/// assert!(!operators[1].is_adjustable());
/// ```
pub struct PerturbationRegistry {
    factories: BTreeMap<PerturbationKind, PerturbationFactory>,
}

impl PerturbationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) the factory for `kind`.
    pub fn register<F>(&mut self, kind: PerturbationKind, factory: F) -> &mut Self
    where
        F: Fn(&PerturbationSettings) -> Box<dyn Perturbation> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
        self
    }

    pub fn contains(&self, kind: PerturbationKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Instantiates the operators for `kinds`, in order.
    ///
    /// # Errors
    ///
    /// [`AilsError::Config`] when `kinds` is empty or names an operator with no
    /// registered factory.
    pub fn build(
        &self,
        kinds: &[PerturbationKind],
        settings: &PerturbationSettings,
    ) -> Result<Vec<Box<dyn Perturbation>>> {
        if kinds.is_empty() {
            return Err(AilsError::Config("perturbation portfolio is empty".into()));
        }
        kinds
            .iter()
            .map(|kind| {
                let factory = self.factories.get(kind).ok_or_else(|| {
                    AilsError::Config(format!("no factory registered for operator '{kind}'"))
                })?;
                let operator = factory(settings);
                if operator.kind() != *kind {
                    return Err(AilsError::Config(format!(
                        "factory for '{}' produced a '{}' operator",
                        kind,
                        operator.kind()
                    )));
                }
                Ok(operator)
            })
            .collect()
    }
}

impl Default for PerturbationRegistry {
    /// Registry with the built-in operators.
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .register(PerturbationKind::Sequential, |s| {
                Box::new(SequentialRemoval::new(s.insertion.clone()))
            })
            .register(PerturbationKind::Concentric, |s| {
                Box::new(ConcentricRemoval::new(s.insertion.clone()))
            })
            .register(PerturbationKind::Decomposition, |s| {
                Box::new(Decomposition::new(s.decomposition_routes))
            });
        registry
    }
}

impl fmt::Debug for PerturbationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerturbationRegistry")
            .field("operators", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

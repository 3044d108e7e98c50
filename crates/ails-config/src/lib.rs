//! Configuration system for the AILS-II engine.
//!
//! Load search configuration from TOML or YAML to control the perturbation
//! portfolio, diversity control, acceptance and termination without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use ails_config::{PerturbationKind, SearchConfig, SelectionConfig};
//!
//! let config = SearchConfig::from_toml_str(r#"
//!     random_seed = 7
//!     gamma = 20
//!     perturbations = ["sequential", "concentric", "decomposition"]
//!
//!     [termination]
//!     criterion = "iteration"
//!     limit = 5000
//!
//!     [selection]
//!     type = "periodic_forced"
//!     operator = "decomposition"
//!     period = 100
//! "#).unwrap();
//!
//! assert_eq!(config.gamma, 20);
//! assert_eq!(config.perturbations.len(), 3);
//! assert!(matches!(
//!     config.selection,
//!     SelectionConfig::PeriodicForced { operator: PerturbationKind::Decomposition, period: 100 }
//! ));
//! assert!(config.validate().is_ok());
//! ```
//!
//! Use the AILS-II defaults when the file is missing:
//!
//! ```
//! use ails_config::SearchConfig;
//!
//! let config = SearchConfig::load("ails.toml").unwrap_or_default();
//! assert_eq!(config.gamma, 30);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ails_core::AilsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for AilsError {
    fn from(err: ConfigError) -> Self {
        AilsError::Config(err.to_string())
    }
}

/// Main search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    /// Random seed for reproducible results.
    pub random_seed: Option<u64>,

    /// Strict-improvement tolerance for best-solution tracking.
    pub epsilon: f64,

    /// Iterations between diversity adjustments.
    pub gamma: usize,

    /// Ideal distance at the start of the run.
    pub d_max: f64,

    /// Ideal distance at the end of the run.
    pub d_min: f64,

    /// Shape of the ideal-distance trajectory.
    pub schedule: ScheduleKind,

    /// Stopping criterion.
    pub termination: TerminationConfig,

    /// Ordered perturbation portfolio.
    pub perturbations: Vec<PerturbationKind>,

    /// Per-iteration operator selection policy.
    pub selection: SelectionConfig,

    /// Omega adjustment rule and bounds.
    pub omega: OmegaConfig,

    /// Acceptance criterion.
    pub acceptance: AcceptanceConfig,

    /// Local search configuration.
    pub local_search: LocalSearchConfig,

    /// Reinsertion heuristics drawn at random by perturbations.
    pub insertion: Vec<InsertionKind>,

    /// Decomposition operator configuration.
    pub decomposition: DecompositionConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            epsilon: 0.01,
            gamma: 30,
            d_max: 30.0,
            d_min: 15.0,
            schedule: ScheduleKind::default(),
            termination: TerminationConfig::default(),
            perturbations: vec![PerturbationKind::Sequential, PerturbationKind::Concentric],
            selection: SelectionConfig::default(),
            omega: OmegaConfig::default(),
            acceptance: AcceptanceConfig::default(),
            local_search: LocalSearchConfig::default(),
            insertion: vec![InsertionKind::Distance, InsertionKind::Cost],
            decomposition: DecompositionConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Stops after `limit` perturbation iterations.
    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.termination.criterion = StopCriterionKind::Iteration;
        self.termination.limit = limit as f64;
        self
    }

    /// Stops once `seconds` of clock time have elapsed.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.termination.criterion = StopCriterionKind::Time;
        self.termination.limit = seconds;
        self
    }

    /// Sets the known optimum, stopping as soon as it is reached.
    pub fn with_optimal(mut self, optimal: f64) -> Self {
        self.termination.optimal = Some(optimal);
        self
    }

    /// Sets the strict-improvement tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the diversity adjustment cadence.
    pub fn with_gamma(mut self, gamma: usize) -> Self {
        self.gamma = gamma;
        self
    }

    /// Replaces the perturbation portfolio.
    pub fn with_perturbations(mut self, perturbations: Vec<PerturbationKind>) -> Self {
        self.perturbations = perturbations;
        self
    }

    /// Sets the operator selection policy.
    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the acceptance criterion.
    pub fn with_acceptance(mut self, acceptance: AcceptanceConfig) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Checks every parameter, returning the first problem found.
    ///
    /// # Examples
    ///
    /// ```
    /// use ails_config::{PerturbationKind, SearchConfig, SelectionConfig};
    ///
    /// let config = SearchConfig::new().with_selection(SelectionConfig::PeriodicForced {
    ///     operator: PerturbationKind::Decomposition,
    ///     period: 10,
    /// });
    /// // decomposition is not in the default portfolio
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.perturbations.is_empty() {
            return invalid("perturbation portfolio is empty");
        }
        if self.gamma == 0 {
            return invalid("gamma must be at least 1");
        }
        if !(self.epsilon > 0.0) {
            return invalid(format!("epsilon must be positive, got {}", self.epsilon));
        }
        if !(self.d_min > 0.0) || self.d_min > self.d_max {
            return invalid(format!(
                "ideal distance bounds must satisfy 0 < d_min <= d_max, got {}..{}",
                self.d_min, self.d_max
            ));
        }
        if !(self.termination.limit > 0.0) || !self.termination.limit.is_finite() {
            return invalid(format!(
                "termination limit must be positive and finite, got {}",
                self.termination.limit
            ));
        }
        self.omega.validate()?;
        self.acceptance.validate()?;
        if self.insertion.is_empty() {
            return invalid("insertion heuristic list is empty");
        }
        if self.local_search.neighborhood_size == 0 {
            return invalid("local_search.neighborhood_size must be at least 1");
        }
        if self.decomposition.routes == 0 {
            return invalid("decomposition.routes must be at least 1");
        }

        match self.selection {
            SelectionConfig::UniformRandom => {}
            SelectionConfig::FixedIndex { index } => {
                if index >= self.perturbations.len() {
                    return invalid(format!(
                        "fixed_index {} out of range for {} operators",
                        index,
                        self.perturbations.len()
                    ));
                }
            }
            SelectionConfig::PeriodicForced { operator, .. } => {
                if !self.perturbations.contains(&operator) {
                    return invalid(format!(
                        "forced operator '{}' is not in the perturbation portfolio",
                        operator
                    ));
                }
                if self.perturbations.iter().all(|kind| *kind == operator) {
                    return invalid(format!(
                        "forced operator '{}' leaves no operator for regular iterations",
                        operator
                    ));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(message.into()))
}

/// Identifier of a perturbation operator in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerturbationKind {
    /// Removes strings of consecutive customers.
    Sequential,

    /// Removes the customers nearest to a random seed customer.
    Concentric,

    /// Rebuilds a cluster of neighboring routes from scratch.
    Decomposition,
}

impl PerturbationKind {
    /// Every registered operator.
    pub const ALL: [PerturbationKind; 3] = [
        PerturbationKind::Sequential,
        PerturbationKind::Concentric,
        PerturbationKind::Decomposition,
    ];

    /// Configuration name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            PerturbationKind::Sequential => "sequential",
            PerturbationKind::Concentric => "concentric",
            PerturbationKind::Decomposition => "decomposition",
        }
    }
}

impl fmt::Display for PerturbationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerturbationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PerturbationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::Invalid(format!("unknown perturbation operator '{name}'")))
    }
}

/// Reinsertion heuristic used after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionKind {
    /// Next to the nearest routed customer.
    Distance,

    /// At the cheapest position.
    Cost,
}

/// Shape of the ideal-distance trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// `d_max * (d_min / d_max)^progress`.
    #[default]
    Geometric,

    /// Straight line from `d_max` to `d_min`.
    Linear,
}

/// Which budget the stopping criterion measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCriterionKind {
    /// Perturbation iterations.
    #[default]
    Iteration,

    /// Seconds on the engine clock.
    Time,
}

/// Termination configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Budget type.
    pub criterion: StopCriterionKind,

    /// Iterations, or seconds for [`StopCriterionKind::Time`].
    pub limit: f64,

    /// Known optimal cost; reaching it stops the search.
    pub optimal: Option<f64>,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            criterion: StopCriterionKind::Iteration,
            limit: 1000.0,
            optimal: None,
        }
    }
}

/// Operator selection policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionConfig {
    /// Uniformly random operator each iteration.
    #[default]
    UniformRandom,

    /// Always the operator at `index`.
    FixedIndex { index: usize },

    /// `operator` every `period` iterations with forced acceptance,
    /// uniformly random among the others otherwise.
    PeriodicForced {
        operator: PerturbationKind,
        period: u64,
    },
}

/// Omega adjustment rule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OmegaRule {
    /// Moves omega by `step` towards the ideal distance.
    FixedStep {
        #[serde(default = "default_step")]
        step: f64,
    },

    /// Scales omega by `ideal / mean`.
    Proportional,
}

fn default_step() -> f64 {
    1.0
}

impl Default for OmegaRule {
    fn default() -> Self {
        OmegaRule::FixedStep {
            step: default_step(),
        }
    }
}

/// Omega configuration shared by every adjustable operator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OmegaConfig {
    /// Adjustment rule.
    pub rule: OmegaRule,

    /// Lower bound.
    pub min: f64,

    /// Upper bound; `customers - 2` when absent.
    pub max: Option<f64>,

    /// Starting value; `d_max` when absent.
    pub initial: Option<f64>,
}

impl Default for OmegaConfig {
    fn default() -> Self {
        Self {
            rule: OmegaRule::default(),
            min: 1.0,
            max: None,
            initial: None,
        }
    }
}

impl OmegaConfig {
    /// Resolves `(min, max)` for an instance with `customers` customers.
    ///
    /// The upper bound never drops below the lower bound, so tiny instances
    /// get a degenerate but valid range.
    pub fn bounds(&self, customers: usize) -> (f64, f64) {
        let max = self
            .max
            .unwrap_or_else(|| customers.saturating_sub(2) as f64);
        (self.min, max.max(self.min))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min >= 1.0) {
            return invalid(format!("omega.min must be at least 1, got {}", self.min));
        }
        if let Some(max) = self.max {
            if max < self.min {
                return invalid(format!(
                    "omega.max {} is below omega.min {}",
                    max, self.min
                ));
            }
        }
        if let Some(initial) = self.initial {
            if !(initial > 0.0) {
                return invalid(format!("omega.initial must be positive, got {initial}"));
            }
        }
        if let OmegaRule::FixedStep { step } = self.rule {
            if !(step > 0.0) {
                return invalid(format!("omega step must be positive, got {step}"));
            }
        }
        Ok(())
    }
}

/// Acceptance criterion configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptanceConfig {
    /// AILS-II threshold over recent local optima.
    Threshold {
        #[serde(default = "default_eta_max")]
        eta_max: f64,
        #[serde(default = "default_eta_min")]
        eta_min: f64,
    },

    /// Accept candidates no worse than the reference.
    BetterThanReference,

    /// Accept every candidate.
    AcceptAll,
}

fn default_eta_max() -> f64 {
    1.0
}

fn default_eta_min() -> f64 {
    0.01
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        AcceptanceConfig::Threshold {
            eta_max: default_eta_max(),
            eta_min: default_eta_min(),
        }
    }
}

impl AcceptanceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let AcceptanceConfig::Threshold { eta_max, eta_min } = *self {
            let in_range = |eta: f64| eta > 0.0 && eta <= 1.0;
            if !in_range(eta_max) || !in_range(eta_min) || eta_min > eta_max {
                return invalid(format!(
                    "eta bounds must satisfy 0 < eta_min <= eta_max <= 1, got {eta_min}..{eta_max}"
                ));
            }
        }
        Ok(())
    }
}

/// Local search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Nearest neighbors examined per customer.
    pub neighborhood_size: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            neighborhood_size: 40,
        }
    }
}

/// Decomposition operator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DecompositionConfig {
    /// Neighboring routes rebuilt per application.
    pub routes: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self { routes: 3 }
    }
}

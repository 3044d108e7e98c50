//! Omega tuning against the annealed ideal distance.

use std::collections::BTreeMap;

use ails_config::{OmegaRule, SearchConfig};
use tracing::trace;

use super::omega::{OmegaAdjustment, OmegaKey, OmegaState};
use super::schedule::IdealDistanceSchedule;

/// Owns every [`OmegaState`] and the ideal-distance schedule.
///
/// States are created lazily the first time an `(operator, routes)` pair is
/// seen, with the operator's own bounds or the global ones. Every `gamma` calls to [`DiversityController::adjust`] the ideal
/// distance is re-evaluated and each state with recorded distances is moved
/// towards it.
#[derive(Debug, Clone)]
pub struct DiversityController {
    schedule: IdealDistanceSchedule,
    gamma: usize,
    rule: OmegaRule,
    min: f64,
    max: f64,
    initial: f64,
    ideal: f64,
    since_update: usize,
    rounds: u64,
    states: BTreeMap<OmegaKey, OmegaState>,
}

impl DiversityController {
    /// Creates a controller with omega bounds `[min, max]` and starting value
    /// `initial` (clamped into the bounds).
    pub fn new(
        schedule: IdealDistanceSchedule,
        gamma: usize,
        rule: OmegaRule,
        (min, max): (f64, f64),
        initial: f64,
    ) -> Self {
        let max = max.max(min);
        Self {
            schedule,
            gamma: gamma.max(1),
            rule,
            min,
            max,
            initial: initial.clamp(min, max),
            ideal: schedule.ideal_distance(0.0),
            since_update: 0,
            rounds: 0,
            states: BTreeMap::new(),
        }
    }

    /// Builds the controller for an instance with `customers` customers.
    pub fn from_config(config: &SearchConfig, customers: usize) -> Self {
        let schedule = IdealDistanceSchedule::new(config.schedule, config.d_max, config.d_min);
        let bounds = config.omega.bounds(customers);
        let initial = config.omega.initial.unwrap_or(config.d_max);
        Self::new(schedule, config.gamma, config.omega.rule, bounds, initial)
    }

    /// Current omega for `key`, creating its state with the global bounds on
    /// first use.
    pub fn omega(&mut self, key: OmegaKey) -> f64 {
        self.omega_within(key, (self.min, self.max))
    }

    /// Current omega for `key`, creating its state clamped to `(min, max)` on
    /// first use. Bounds of an existing state are left alone.
    pub fn omega_within(&mut self, key: OmegaKey, (min, max): (f64, f64)) -> f64 {
        let initial = self.initial;
        self.states
            .entry(key)
            .or_insert_with(|| OmegaState::new(initial, min, max))
            .omega()
    }

    pub fn state(&self, key: OmegaKey) -> Option<&OmegaState> {
        self.states.get(&key)
    }

    fn state_mut(&mut self, key: OmegaKey) -> &mut OmegaState {
        let (initial, min, max) = (self.initial, self.min, self.max);
        self.states
            .entry(key)
            .or_insert_with(|| OmegaState::new(initial, min, max))
    }

    /// Feeds back the distance produced by the operator behind `key`.
    pub fn record_distance(&mut self, key: OmegaKey, distance: f64) {
        self.state_mut(key).push_distance(distance);
    }

    /// Counts one iteration; every `gamma` iterations re-evaluates the ideal
    /// distance at `progress` and adjusts every state with pending distances.
    ///
    /// Returns the adjustments made, empty between rounds.
    pub fn adjust(&mut self, progress: f64) -> Vec<OmegaAdjustment> {
        self.since_update += 1;
        if self.since_update < self.gamma {
            return Vec::new();
        }
        self.since_update = 0;
        self.rounds += 1;
        self.ideal = self.schedule.ideal_distance(progress);

        let ideal = self.ideal;
        let rule = self.rule;
        let mut adjusted = Vec::new();
        for (key, state) in self.states.iter_mut() {
            let Some(mean) = state.mean_distance() else {
                continue;
            };
            if let Some((old, new)) = state.adjust(ideal, rule) {
                trace!(
                    event = "omega_adjusted",
                    operator = %key.kind,
                    routes = key.routes,
                    mean_distance = mean,
                    ideal_distance = ideal,
                    old_omega = old,
                    new_omega = new,
                );
                adjusted.push(OmegaAdjustment {
                    key: *key,
                    mean_distance: mean,
                    ideal_distance: ideal,
                    old_omega: old,
                    new_omega: new,
                });
            }
        }
        adjusted
    }

    /// Ideal distance from the last adjustment round.
    pub fn ideal_distance(&self) -> f64 {
        self.ideal
    }

    pub fn schedule(&self) -> &IdealDistanceSchedule {
        &self.schedule
    }

    /// Completed adjustment rounds.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Global omega bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Every known state and its omega, ordered by key.
    pub fn snapshot(&self) -> Vec<(OmegaKey, f64)> {
        self.states
            .iter()
            .map(|(key, state)| (*key, state.omega()))
            .collect()
    }
}

//! Search-level scope.
//!
//! Holds everything the stopping criterion and the telemetry read: the clock,
//! the random source, the iteration counter and the best-cost bookkeeping.

use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::clock::Clock;

/// The single random source of a search run.
pub type SearchRng = ChaCha8Rng;

/// Counters and shared resources of one search run.
pub struct SearchScope {
    clock: Box<dyn Clock>,
    rng: SearchRng,
    seed: u64,
    start: Option<Duration>,
    iteration: u64,
    best_f: f64,
    iteration_of_best: u64,
    time_of_best: f64,
    improvements: u64,
    total_time: Option<f64>,
}

impl SearchScope {
    pub fn new(clock: Box<dyn Clock>, seed: u64) -> Self {
        Self {
            clock,
            rng: SearchRng::seed_from_u64(seed),
            seed,
            start: None,
            iteration: 0,
            best_f: f64::INFINITY,
            iteration_of_best: 0,
            time_of_best: 0.0,
            improvements: 0,
            total_time: None,
        }
    }

    /// Takes the reference clock reading; elapsed time is measured from here.
    pub fn start_search(&mut self) {
        self.start = Some(self.clock.now());
        self.iteration = 0;
        self.total_time = None;
    }

    /// Seconds since [`SearchScope::start_search`], zero before it.
    pub fn elapsed(&self) -> f64 {
        match self.start {
            Some(start) => self.clock.now().saturating_sub(start).as_secs_f64(),
            None => 0.0,
        }
    }

    pub fn rng(&mut self) -> &mut SearchRng {
        &mut self.rng
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advances the iteration counter and returns the new (1-based) value.
    pub fn increment_iteration(&mut self) -> u64 {
        self.iteration += 1;
        self.iteration
    }

    /// Completed perturbation iterations.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn best_f(&self) -> f64 {
        self.best_f
    }

    /// Sets the best cost found by the initial construction.
    pub fn set_initial_best(&mut self, f: f64, time: f64) {
        self.best_f = f;
        self.iteration_of_best = 0;
        self.time_of_best = time;
    }

    /// Records an improvement found at the current iteration.
    pub fn record_improvement(&mut self, f: f64, time: f64) {
        self.best_f = f;
        self.iteration_of_best = self.iteration;
        self.time_of_best = time;
        self.improvements += 1;
    }

    /// Iteration of the last improvement.
    pub fn iteration_of_best(&self) -> u64 {
        self.iteration_of_best
    }

    /// Elapsed seconds at the last improvement.
    pub fn time_of_best(&self) -> f64 {
        self.time_of_best
    }

    /// Number of improvements found while iterating.
    pub fn improvements(&self) -> u64 {
        self.improvements
    }

    /// Freezes the total running time.
    pub fn finish_search(&mut self) -> f64 {
        let total = self.elapsed();
        self.total_time = Some(total);
        total
    }

    /// Total running time once the search finished.
    pub fn total_time(&self) -> Option<f64> {
        self.total_time
    }
}

impl fmt::Debug for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchScope")
            .field("clock", &self.clock)
            .field("seed", &self.seed)
            .field("iteration", &self.iteration)
            .field("best_f", &self.best_f)
            .field("iteration_of_best", &self.iteration_of_best)
            .field("time_of_best", &self.time_of_best)
            .finish()
    }
}

//! Result sinks: passive observers of search progress.
//!
//! The engine reports three events to a [`ResultSink`]: the initial solution,
//! every new best solution and the end of the search. Sinks never influence
//! the search; a failing sink is logged at `warn` and the search continues.
//!
//! # Usage
//!
//! ```
//! use ails_solver::sink::{RecordedEvent, RecordingSink, ResultSink};
//! use ails_core::Solution;
//!
//! let mut sink = RecordingSink::new();
//! let handle = sink.clone();
//! sink.on_initial(&Solution::new(), 120.0, 0.5).unwrap();
//!
//! assert_eq!(
//!     handle.events(),
//!     vec![RecordedEvent::Initial { cost: 120.0, time: 0.5 }]
//! );
//! ```

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use ails_core::Solution;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Failure reported by a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Observer of search progress.
///
/// All methods default to doing nothing.
pub trait ResultSink: Send {
    /// Called once after the initial construction, repair and local search.
    fn on_initial(&mut self, _solution: &Solution, _cost: f64, _time: f64) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called for every strict improvement of the best solution.
    fn on_new_best(
        &mut self,
        _iteration: u64,
        _time: f64,
        _cost: f64,
        _solution: &Solution,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called once when the search stops.
    fn on_finished(
        &mut self,
        _solution: &Solution,
        _cost: f64,
        _total_time: f64,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<T: ResultSink + ?Sized> ResultSink for Box<T> {
    fn on_initial(&mut self, solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        (**self).on_initial(solution, cost, time)
    }

    fn on_new_best(
        &mut self,
        iteration: u64,
        time: f64,
        cost: f64,
        solution: &Solution,
    ) -> Result<(), SinkError> {
        (**self).on_new_best(iteration, time, cost, solution)
    }

    fn on_finished(&mut self, solution: &Solution, cost: f64, total_time: f64) -> Result<(), SinkError> {
        (**self).on_finished(solution, cost, total_time)
    }
}

/// A sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ResultSink for NoopSink {}

/// Reports events through `tracing` at `info` level.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink {
    label: String,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `label` field (usually the instance name) to every event.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl ResultSink for LoggingSink {
    fn on_initial(&mut self, solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        info!(
            event = "sink_initial",
            label = %self.label,
            cost = cost,
            time = time,
            routes = solution.non_empty_routes(),
        );
        Ok(())
    }

    fn on_new_best(
        &mut self,
        iteration: u64,
        time: f64,
        cost: f64,
        solution: &Solution,
    ) -> Result<(), SinkError> {
        info!(
            event = "sink_new_best",
            label = %self.label,
            iteration = iteration,
            cost = cost,
            time = time,
            routes = solution.non_empty_routes(),
        );
        Ok(())
    }

    fn on_finished(&mut self, solution: &Solution, cost: f64, total_time: f64) -> Result<(), SinkError> {
        info!(
            event = "sink_finished",
            label = %self.label,
            cost = cost,
            total_time = total_time,
            routes = solution.non_empty_routes(),
        );
        Ok(())
    }
}

/// An event captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    Initial { cost: f64, time: f64 },
    NewBest { iteration: u64, time: f64, cost: f64 },
    Finished { cost: f64, total_time: f64 },
}

/// Keeps every event in memory.
///
/// Clones share the same event list, so a handle kept outside the engine
/// sees what the engine's copy recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Costs of the `NewBest` events, in order.
    pub fn best_costs(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RecordedEvent::NewBest { cost, .. } => Some(cost),
                _ => None,
            })
            .collect()
    }

    pub fn new_best_count(&self) -> usize {
        self.best_costs().len()
    }

    fn push(&self, event: RecordedEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl ResultSink for RecordingSink {
    fn on_initial(&mut self, _solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        self.push(RecordedEvent::Initial { cost, time });
        Ok(())
    }

    fn on_new_best(
        &mut self,
        iteration: u64,
        time: f64,
        cost: f64,
        _solution: &Solution,
    ) -> Result<(), SinkError> {
        self.push(RecordedEvent::NewBest {
            iteration,
            time,
            cost,
        });
        Ok(())
    }

    fn on_finished(&mut self, _solution: &Solution, cost: f64, total_time: f64) -> Result<(), SinkError> {
        self.push(RecordedEvent::Finished { cost, total_time });
        Ok(())
    }
}

/// Forwards every event to each inner sink in order.
///
/// Every sink sees every event; the first error is returned after all of
/// them ran.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn push(&mut self, sink: Box<dyn ResultSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn fan_out<F>(&mut self, mut f: F) -> Result<(), SinkError>
    where
        F: FnMut(&mut dyn ResultSink) -> Result<(), SinkError>,
    {
        let mut first = None;
        for sink in &mut self.sinks {
            if let Err(err) = f(sink.as_mut()) {
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for CompositeSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl ResultSink for CompositeSink {
    fn on_initial(&mut self, solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        self.fan_out(|sink| sink.on_initial(solution, cost, time))
    }

    fn on_new_best(
        &mut self,
        iteration: u64,
        time: f64,
        cost: f64,
        solution: &Solution,
    ) -> Result<(), SinkError> {
        self.fan_out(|sink| sink.on_new_best(iteration, time, cost, solution))
    }

    fn on_finished(&mut self, solution: &Solution, cost: f64, total_time: f64) -> Result<(), SinkError> {
        self.fan_out(|sink| sink.on_finished(solution, cost, total_time))
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;

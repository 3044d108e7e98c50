//! Engine lifecycle.

use std::fmt;

use serde::Serialize;

/// Phase of a [`SearchEngine`](super::SearchEngine).
///
/// `Created → Constructing → Repairing → LocalSearching → Iterating →
/// Stopped`. The three initial phases only last while `initialize` runs;
/// every transition is logged as an `engine_state` debug event. Between calls
/// the engine is `Created`, `Iterating` or `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Created,
    Constructing,
    Repairing,
    LocalSearching,
    Iterating,
    Stopped,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Created => "created",
            EngineState::Constructing => "constructing",
            EngineState::Repairing => "repairing",
            EngineState::LocalSearching => "local_searching",
            EngineState::Iterating => "iterating",
            EngineState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

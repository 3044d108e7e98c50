//! Search entry points that hide the engine wiring.

use std::path::Path;

use ails_config::SearchConfig;
use ails_core::{loading, Instance, Result};
use ails_solver::sink::{LoggingSink, ResultSink};
use ails_solver::{SearchEngineBuilder, SearchOutcome};

/// Runs one search on `instance` with `config`.
///
/// Progress is reported through `tracing`; with the `console` feature the
/// colored console is installed on first use.
pub fn solve(instance: Instance, config: SearchConfig) -> Result<SearchOutcome> {
    let label = instance.name().to_string();
    solve_with_sink(instance, config, LoggingSink::with_label(label))
}

/// Runs one search and reports its progress to `sink`.
pub fn solve_with_sink(
    instance: Instance,
    config: SearchConfig,
    sink: impl ResultSink + 'static,
) -> Result<SearchOutcome> {
    #[cfg(feature = "console")]
    ails_console::init();

    SearchEngineBuilder::new(instance, config)
        .with_sink(sink)
        .build()?
        .run()
}

/// Loads a CVRPLIB instance and an optional TOML/YAML configuration, then
/// runs the search.
///
/// Without a configuration file the defaults are used.
pub fn solve_files(instance: impl AsRef<Path>, config: Option<&Path>) -> Result<SearchOutcome> {
    let instance = loading::read_instance(instance)?;
    let config = match config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    solve(instance, config)
}

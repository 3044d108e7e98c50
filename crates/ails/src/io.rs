//! File-backed result sinks.
//!
//! - [`SolutionFileSink`] keeps `<dir>/<name>.sol` up to date with the best
//!   solution in the plain-text record format.
//! - [`ConvergenceCsvSink`] appends one `time;cost` row per improvement to
//!   `<dir>/<name>.csv`.
//!
//! Both report I/O failures as [`SinkError`]; the engine logs them and keeps
//! searching.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ails_core::{Solution, SolutionRecord};
use ails_solver::sink::{ResultSink, SinkError};
use tracing::debug;

/// Overwrites a `.sol` file with the best solution on every event.
#[derive(Debug, Clone)]
pub struct SolutionFileSink {
    path: PathBuf,
}

impl SolutionFileSink {
    /// Writes to `<dir>/<name>.sol`.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.sol")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        let record = SolutionRecord::new(solution, cost, time);
        fs::write(&self.path, format!("{record}\n"))?;
        debug!(event = "solution_written", path = %self.path.display(), cost = cost);
        Ok(())
    }
}

impl ResultSink for SolutionFileSink {
    fn on_initial(&mut self, solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        self.write(solution, cost, time)
    }

    fn on_new_best(
        &mut self,
        _iteration: u64,
        time: f64,
        cost: f64,
        solution: &Solution,
    ) -> Result<(), SinkError> {
        self.write(solution, cost, time)
    }

    fn on_finished(&mut self, solution: &Solution, cost: f64, total_time: f64) -> Result<(), SinkError> {
        self.write(solution, cost, total_time)
    }
}

/// Appends `time;cost` rows (4 decimals, `.` separator) for the initial
/// solution and every improvement.
///
/// The file is truncated when the sink is created.
#[derive(Debug)]
pub struct ConvergenceCsvSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ConvergenceCsvSink {
    /// Creates (or truncates) `<dir>/<name>.csv`.
    pub fn create(dir: impl AsRef<Path>, name: &str) -> std::io::Result<Self> {
        let path = dir.as_ref().join(format!("{name}.csv"));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, time: f64, cost: f64) -> Result<(), SinkError> {
        writeln!(self.writer, "{:.4};{:.4}", time, cost)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl ResultSink for ConvergenceCsvSink {
    fn on_initial(&mut self, _solution: &Solution, cost: f64, time: f64) -> Result<(), SinkError> {
        self.append(time, cost)
    }

    fn on_new_best(
        &mut self,
        _iteration: u64,
        time: f64,
        cost: f64,
        _solution: &Solution,
    ) -> Result<(), SinkError> {
        self.append(time, cost)
    }

    fn on_finished(&mut self, _solution: &Solution, _cost: f64, _total_time: f64) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ails_test::instances::ten_customer_scenario;

    #[test]
    fn test_solution_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let instance = ten_customer_scenario();
        let mut sink = SolutionFileSink::new(dir.path(), "ten");
        let first = Solution::with_routes(&instance, vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]]);
        let second = Solution::with_routes(&instance, vec![vec![5, 4, 3, 2, 1], vec![6, 7, 8, 9, 10]]);

        sink.on_initial(&first, 123.456789, 0.5).unwrap();
        sink.on_new_best(3, 1.25, 100.0, &second).unwrap();

        let text = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(
            text,
            "Route #1: 5 4 3 2 1\nRoute #2: 6 7 8 9 10\nCost 100.0000\nTime 1.2500\n"
        );
    }

    #[test]
    fn test_csv_rows_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let solution = Solution::new();
        let mut sink = ConvergenceCsvSink::create(dir.path(), "run").unwrap();

        sink.on_initial(&solution, 120.0, 0.0).unwrap();
        sink.on_new_best(4, 0.123456, 110.5, &solution).unwrap();
        sink.on_finished(&solution, 110.5, 2.0).unwrap();

        let text = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text, "0.0000;120.0000\n0.1235;110.5000\n");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = SolutionFileSink::new(dir.path().join("missing"), "x");
        let err = sink.on_initial(&Solution::new(), 1.0, 0.0).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }
}

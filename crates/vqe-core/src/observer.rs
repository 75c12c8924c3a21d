//! Progress reporting for the convergence loop.
//!
//! Reporting is a side channel: observers see progress lines and the final
//! summary but cannot influence control flow.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::runner::Termination;

/// One progress line, emitted on steps where `n % print_freq == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressLine {
    /// Zero-based step index.
    pub iteration: usize,
    /// Energy after the step.
    pub energy: f64,
    /// Absolute change from the previous accepted energy.
    pub convergence: f64,
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Iteration = {},  Energy = {:.8} Ha,  Convergence parameter = {:.8} Ha",
            self.iteration, self.energy, self.convergence
        )
    }
}

/// Terminal report of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// How the loop ended.
    pub status: Termination,
    /// Last evaluated energy.
    pub final_energy: f64,
    /// Number of update steps taken.
    pub iterations: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final value of the energy = {:.8}", self.final_energy)?;
        write!(f, "Number of iterations = {}", self.iterations)
    }
}

/// Receives progress from the loop.
pub trait ProgressObserver {
    /// Called on every reporting step.
    fn on_progress(&mut self, line: &ProgressLine);

    /// Called once when the loop stops.
    fn on_finish(&mut self, _summary: &RunSummary) {}
}

/// Logs progress through `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&mut self, line: &ProgressLine) {
        info!(
            iteration = line.iteration,
            energy = line.energy,
            convergence = line.convergence,
            "{line}"
        );
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        info!(
            status = ?summary.status,
            final_energy = summary.final_energy,
            iterations = summary.iterations,
            "optimization finished"
        );
    }
}

/// Prints progress to stdout in the plain experiment-log format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl ProgressObserver for ConsoleObserver {
    fn on_progress(&mut self, line: &ProgressLine) {
        println!("{line}");
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        println!();
        println!("{summary}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&mut self, _line: &ProgressLine) {}
}

/// Keeps every line and the summary in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    lines: Vec<ProgressLine>,
    summary: Option<RunSummary>,
}

impl RecordingObserver {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received so far.
    pub fn lines(&self) -> &[ProgressLine] {
        &self.lines
    }

    /// Summary, once the loop has finished.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&mut self, line: &ProgressLine) {
        self.lines.push(*line);
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        self.summary = Some(*summary);
    }
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn on_progress(&mut self, line: &ProgressLine) {
        (**self).on_progress(line);
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        (**self).on_finish(summary);
    }
}

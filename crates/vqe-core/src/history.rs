//! Per-run optimization history.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Energies, parameters and (optionally) states of the accepted iterations.
///
/// Created fresh for every run and handed back to the caller in the
/// [`RunOutcome`](crate::RunOutcome). Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    energies: Vec<f64>,
    params: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    states: Vec<Vec<Complex64>>,
}

impl History {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, energy: f64, params: &[f64], state: Option<Vec<Complex64>>) {
        self.energies.push(energy);
        self.params.push(params.to_vec());
        if let Some(state) = state {
            self.states.push(state);
        }
    }

    /// Recorded energies, oldest first.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Recorded parameter vectors, aligned with [`energies`](Self::energies).
    pub fn params(&self) -> &[Vec<f64>] {
        &self.params
    }

    /// Recorded state vectors; empty unless states were recorded.
    pub fn states(&self) -> &[Vec<Complex64>] {
        &self.states
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Most recent energy.
    pub fn last_energy(&self) -> Option<f64> {
        self.energies.last().copied()
    }

    /// Lowest recorded energy.
    pub fn min_energy(&self) -> Option<f64> {
        self.energies.iter().copied().reduce(f64::min)
    }

    /// Split into `(energies, params, states)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<Vec<f64>>, Vec<Vec<Complex64>>) {
        (self.energies, self.params, self.states)
    }
}

//! Energy landscape over a square two-parameter grid.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use vqe_core::Objective;

use crate::error::{VizError, VizResult};

/// Grid points per axis used by [`Landscape::compute_default`].
pub const DEFAULT_RESOLUTION: usize = 100;

/// Axis range used by [`Landscape::compute_default`].
pub const DEFAULT_RANGE: (f64, f64) = (0.0, TAU);

/// Sampled energies `E(θ₀, θ₁)`.
///
/// `energies[row][col]` is the energy at `(theta0[col], theta1[row])`, the
/// layout contour plotters expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landscape {
    /// θ₀ sample points (columns).
    pub theta0: Vec<f64>,
    /// θ₁ sample points (rows).
    pub theta1: Vec<f64>,
    /// Row-major energy grid.
    pub energies: Vec<Vec<f64>>,
}

impl Landscape {
    /// Sample `objective` on a `resolution × resolution` grid spanning
    /// `range` (endpoints included) on both axes.
    pub fn compute<O: Objective + ?Sized>(
        objective: &mut O,
        resolution: usize,
        range: (f64, f64),
    ) -> VizResult<Self> {
        if resolution == 0 {
            return Err(VizError::InvalidResolution);
        }
        let axis = linspace(range.0, range.1, resolution);
        debug!(resolution, lo = range.0, hi = range.1, "sampling landscape");

        let mut energies = Vec::with_capacity(resolution);
        for &t1 in &axis {
            let row = axis
                .iter()
                .map(|&t0| objective.evaluate(&[t0, t1]))
                .collect::<Result<Vec<_>, _>>()?;
            energies.push(row);
        }
        Ok(Self {
            theta0: axis.clone(),
            theta1: axis,
            energies,
        })
    }

    /// 100 × 100 samples over `[0, 2π]`.
    pub fn compute_default<O: Objective + ?Sized>(objective: &mut O) -> VizResult<Self> {
        Self::compute(objective, DEFAULT_RESOLUTION, DEFAULT_RANGE)
    }

    /// Lowest sampled point as `(θ₀, θ₁, energy)`.
    pub fn minimum(&self) -> Option<(f64, f64, f64)> {
        let mut best: Option<(f64, f64, f64)> = None;
        for (row, t1) in self.energies.iter().zip(&self.theta1) {
            for (&e, &t0) in row.iter().zip(&self.theta0) {
                if best.is_none_or(|(_, _, b)| e < b) {
                    best = Some((t0, *t1, e));
                }
            }
        }
        best
    }
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(|i| lo + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vqe_core::FnObjective;

    #[test]
    fn rows_follow_theta1() {
        let mut f = FnObjective::new(|p: &[f64]| p[0] + 10.0 * p[1]);
        let land = Landscape::compute(&mut f, 3, (0.0, 1.0)).unwrap();
        assert_eq!(land.theta0, vec![0.0, 0.5, 1.0]);
        assert_relative_eq!(land.energies[0][2], 1.0);
        assert_relative_eq!(land.energies[2][0], 10.0);
        assert_eq!(f.evaluations(), 9);
    }

    #[test]
    fn default_grid_spans_full_turn() {
        let mut f = FnObjective::new(|p: &[f64]| p[0].cos() * p[1].sin());
        let land = Landscape::compute_default(&mut f).unwrap();
        assert_eq!(land.energies.len(), DEFAULT_RESOLUTION);
        assert_eq!(land.energies[0].len(), DEFAULT_RESOLUTION);
        assert_relative_eq!(*land.theta0.last().unwrap(), TAU, epsilon = 1e-12);
    }

    #[test]
    fn minimum_found() {
        let mut f = FnObjective::new(|p: &[f64]| (p[0] - 1.0).powi(2) + (p[1] - 2.0).powi(2));
        let land = Landscape::compute(&mut f, 5, (0.0, 2.0)).unwrap();
        let (t0, t1, e) = land.minimum().unwrap();
        assert_relative_eq!(t0, 1.0);
        assert_relative_eq!(t1, 2.0);
        assert_relative_eq!(e, 0.0);
    }

    #[test]
    fn zero_resolution_rejected() {
        let mut f = FnObjective::new(|_: &[f64]| 0.0);
        assert!(matches!(
            Landscape::compute(&mut f, 0, DEFAULT_RANGE),
            Err(VizError::InvalidResolution)
        ));
    }
}

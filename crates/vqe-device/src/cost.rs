//! Expectation-value cost E(θ) = ⟨ψ(θ)|H|ψ(θ)⟩.
//!
//! Gradients use the parameter-shift rule and the metric is the real part
//! of the quantum geometric tensor (Fubini-Study metric). Both are exact
//! because every parameter drives a single Pauli rotation:
//!
//! ```text
//!   ∂ᵢE    = ½ [E(θ + ½π eᵢ) − E(θ − ½π eᵢ)]
//!   ∂ᵢ|ψ⟩  = ½ |ψ(θ + π eᵢ)⟩
//!   gᵢⱼ    = Re⟨∂ᵢψ|∂ⱼψ⟩ − Re(⟨∂ᵢψ|ψ⟩⟨ψ|∂ⱼψ⟩)
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::trace;

use vqe_core::{MetricApproximation, Objective, StatefulObjective, VqeResult};

use crate::ansatz::Ansatz;
use crate::error::{DeviceError, DeviceResult};
use crate::hamiltonian::Hamiltonian;
use crate::statevector::Statevector;

/// Energy of an ansatz state under a Hamiltonian.
#[derive(Debug, Clone)]
pub struct ExpectationCost {
    ansatz: Ansatz,
    hamiltonian: Hamiltonian,
    circuit_evaluations: usize,
}

impl ExpectationCost {
    /// Pair an ansatz with a Hamiltonian on a register wide enough for it.
    pub fn new(ansatz: Ansatz, hamiltonian: Hamiltonian) -> DeviceResult<Self> {
        let needed = hamiltonian.min_qubits();
        if needed > ansatz.num_qubits() {
            return Err(DeviceError::QubitOutOfRange {
                qubit: needed - 1,
                num_qubits: ansatz.num_qubits(),
            });
        }
        Ok(Self {
            ansatz,
            hamiltonian,
            circuit_evaluations: 0,
        })
    }

    /// The ansatz.
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// The Hamiltonian.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// Circuits executed so far.
    pub fn circuit_evaluations(&self) -> usize {
        self.circuit_evaluations
    }

    /// Prepare ψ(θ).
    pub fn state(&mut self, params: &[f64]) -> DeviceResult<Statevector> {
        self.circuit_evaluations += 1;
        self.ansatz.prepare(params)
    }

    /// E(θ).
    pub fn energy(&mut self, params: &[f64]) -> DeviceResult<f64> {
        let state = self.state(params)?;
        self.hamiltonian.expectation(&state)
    }

    /// Energy and the state it was measured on, from one circuit run.
    pub fn energy_and_state(&mut self, params: &[f64]) -> DeviceResult<(f64, Statevector)> {
        let state = self.state(params)?;
        let energy = self.hamiltonian.expectation(&state)?;
        Ok((energy, state))
    }

    /// ∇E by the parameter-shift rule.
    pub fn parameter_shift_gradient(&mut self, params: &[f64]) -> DeviceResult<Vec<f64>> {
        let mut shifted = params.to_vec();
        let mut grad = Vec::with_capacity(params.len());
        for i in 0..params.len() {
            shifted[i] = params[i] + FRAC_PI_2;
            let plus = self.energy(&shifted)?;
            shifted[i] = params[i] - FRAC_PI_2;
            let minus = self.energy(&shifted)?;
            shifted[i] = params[i];
            grad.push(0.5 * (plus - minus));
        }
        trace!(?grad, "parameter-shift gradient");
        Ok(grad)
    }

    /// Fubini-Study metric at θ, restricted per `approximation`.
    ///
    /// Entries outside the retained pattern are zero. Blocks follow the
    /// ansatz layers.
    pub fn fubini_study_metric(
        &mut self,
        params: &[f64],
        approximation: MetricApproximation,
    ) -> DeviceResult<DMatrix<f64>> {
        let psi = self.state(params)?;
        let mut derivatives = Vec::with_capacity(params.len());
        let mut shifted = params.to_vec();
        for i in 0..params.len() {
            shifted[i] = params[i] + PI;
            derivatives.push(self.state(&shifted)?);
            shifted[i] = params[i];
        }

        // The ½ factors of ∂ψ are applied once, as ¼ on every entry.
        let overlaps: Vec<Complex64> = derivatives.iter().map(|d| d.inner(&psi)).collect();
        let n = params.len();
        let mut g = DMatrix::zeros(n, n);
        for block in self.retained_blocks(n, approximation) {
            for i in block.clone() {
                for j in block.clone() {
                    let direct = derivatives[i].inner(&derivatives[j]).re;
                    let projected = (overlaps[i] * overlaps[j].conj()).re;
                    g[(i, j)] = 0.25 * (direct - projected);
                }
            }
        }
        Ok(g)
    }

    fn retained_blocks(
        &self,
        n: usize,
        approximation: MetricApproximation,
    ) -> Vec<std::ops::Range<usize>> {
        match approximation {
            MetricApproximation::Diagonal => (0..n).map(|i| i..i + 1).collect(),
            MetricApproximation::BlockDiagonal => self.ansatz.param_blocks(),
        }
    }
}

impl Objective for ExpectationCost {
    fn evaluate(&mut self, params: &[f64]) -> VqeResult<f64> {
        Ok(self.energy(params)?)
    }

    fn gradient(&mut self, params: &[f64]) -> VqeResult<Vec<f64>> {
        Ok(self.parameter_shift_gradient(params)?)
    }

    fn metric_tensor(
        &mut self,
        params: &[f64],
        approximation: MetricApproximation,
    ) -> VqeResult<DMatrix<f64>> {
        Ok(self.fubini_study_metric(params, approximation)?)
    }
}

impl StatefulObjective for ExpectationCost {
    fn evaluate_with_state(&mut self, params: &[f64]) -> VqeResult<(f64, Vec<Complex64>)> {
        let (energy, state) = self.energy_and_state(params)?;
        Ok((energy, state.into_amplitudes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansatz::Operation;
    use approx::assert_relative_eq;

    fn x_plus_z() -> ExpectationCost {
        ExpectationCost::new(Ansatz::single_qubit(), "1.0 * X0 + 1.0 * Z0".parse().unwrap()).unwrap()
    }

    #[test]
    fn energy_matches_closed_form() {
        let mut cost = x_plus_z();
        let (t0, t1) = (0.4_f64, -1.1_f64);
        let e = cost.energy(&[t0, t1]).unwrap();
        assert_relative_eq!(e, t0.cos() * (t1.sin() + t1.cos()), epsilon = 1e-12);
        assert_eq!(cost.circuit_evaluations(), 1);
    }

    #[test]
    fn parameter_shift_matches_analytic() {
        let mut cost = x_plus_z();
        let (t0, t1) = (0.4_f64, -1.1_f64);
        let g = cost.parameter_shift_gradient(&[t0, t1]).unwrap();
        assert_relative_eq!(g[0], -t0.sin() * (t1.sin() + t1.cos()), epsilon = 1e-10);
        assert_relative_eq!(g[1], t0.cos() * (t1.cos() - t1.sin()), epsilon = 1e-10);
        assert_eq!(cost.circuit_evaluations(), 4);
    }

    #[test]
    fn single_qubit_metric() {
        // g = diag(1/4, cos²θ₀ / 4) for RX(θ₀) RY(θ₁) on |0⟩
        let mut cost = x_plus_z();
        let t0 = 0.7_f64;
        let g = cost
            .fubini_study_metric(&[t0, 0.2], MetricApproximation::BlockDiagonal)
            .unwrap();
        assert_relative_eq!(g[(0, 0)], 0.25, epsilon = 1e-12);
        assert_relative_eq!(g[(1, 1)], 0.25 * t0.cos().powi(2), epsilon = 1e-12);
        assert_eq!(g[(0, 1)], 0.0);
    }

    #[test]
    fn diagonal_restricts_blocks() {
        let ansatz = Ansatz::new(2)
            .unwrap()
            .with_layer(vec![Operation::ry(0), Operation::ry(1)])
            .unwrap()
            .with_layer(vec![Operation::Cx { control: 0, target: 1 }])
            .unwrap()
            .with_layer(vec![Operation::rx(0), Operation::rx(1)])
            .unwrap();
        let mut cost = ExpectationCost::new(ansatz, "1.0 * Z0 Z1".parse().unwrap()).unwrap();
        let params = [0.3, 0.5, 0.7, 0.9];

        let block = cost
            .fubini_study_metric(&params, MetricApproximation::BlockDiagonal)
            .unwrap();
        let diag = cost
            .fubini_study_metric(&params, MetricApproximation::Diagonal)
            .unwrap();

        assert_eq!(block[(0, 2)], 0.0);
        for i in 0..4 {
            assert_relative_eq!(block[(i, i)], diag[(i, i)], epsilon = 1e-12);
            for j in 0..4 {
                if i != j {
                    assert_eq!(diag[(i, j)], 0.0);
                }
            }
        }
        assert_relative_eq!(block, block.transpose(), epsilon = 1e-12);
    }

    #[test]
    fn hamiltonian_wider_than_register() {
        let err = ExpectationCost::new(Ansatz::single_qubit(), "1.0 * Z1".parse().unwrap()).unwrap_err();
        assert!(matches!(err, DeviceError::QubitOutOfRange { qubit: 1, num_qubits: 1 }));
    }
}

//! Dense statevector with the handful of gates the reference ansatz needs.
//!
//! Amplitudes are stored little-endian: bit `q` of the basis index is the
//! state of qubit `q`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};
use crate::hamiltonian::{PauliOp, PauliString};

/// Widest register the dense simulator will allocate.
pub const MAX_QUBITS: usize = 24;

/// A pure quantum state on `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// |0...0⟩ on `num_qubits` qubits.
    ///
    /// Callers keep `num_qubits` at or below [`MAX_QUBITS`]; [`Ansatz`]
    /// checks this on construction.
    ///
    /// [`Ansatz`]: crate::ansatz::Ansatz
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The 2^n amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }

    /// ⟨self|other⟩.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Real expectation value ⟨ψ|P|ψ⟩ of a Pauli string.
    pub fn expectation(&self, pauli: &PauliString) -> DeviceResult<f64> {
        let mut rotated = self.clone();
        for &(qubit, op) in pauli.ops() {
            let qubit = qubit as usize;
            rotated.check_qubit(qubit)?;
            match op {
                PauliOp::I => {}
                PauliOp::X => rotated.x(qubit),
                PauliOp::Y => rotated.y(qubit),
                PauliOp::Z => rotated.z(qubit),
            }
        }
        Ok(self.inner(&rotated).re)
    }

    pub(crate) fn check_qubit(&self, qubit: usize) -> DeviceResult<()> {
        if qubit >= self.num_qubits {
            return Err(DeviceError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Gate kernels
    // =========================================================================

    pub(crate) fn x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    pub(crate) fn y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    pub(crate) fn z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    pub(crate) fn h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let s = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = s * (a + b);
                self.amplitudes[j] = s * (a - b);
            }
        }
    }

    pub(crate) fn rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    pub(crate) fn ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    pub(crate) fn rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let lo = Complex64::from_polar(1.0, -theta / 2.0);
        let hi = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { lo } else { hi };
        }
    }

    pub(crate) fn cx(&mut self, control: usize, target: usize) {
        let c_mask = 1 << control;
        let t_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & c_mask != 0 && i & t_mask == 0 {
                self.amplitudes.swap(i, i | t_mask);
            }
        }
    }
}

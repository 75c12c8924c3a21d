//! Layered parametrized circuits.
//!
//! Every rotation consumes the next parameter in order, so each parameter
//! drives exactly one gate. Layers group the rotations that the
//! block-diagonal metric approximation treats together.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};
use crate::statevector::{MAX_QUBITS, Statevector};

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// RX(θ) = exp(-iθX/2).
    X,
    /// RY(θ) = exp(-iθY/2).
    Y,
    /// RZ(θ) = exp(-iθZ/2).
    Z,
}

/// A circuit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Hadamard.
    H(usize),
    /// Pauli-X.
    X(usize),
    /// CNOT.
    Cx {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Parametrized rotation; its angle is the next free parameter.
    Rotation {
        /// Rotation axis.
        axis: Axis,
        /// Qubit rotated.
        qubit: usize,
    },
}

impl Operation {
    /// RX on `qubit`.
    pub fn rx(qubit: usize) -> Self {
        Self::Rotation { axis: Axis::X, qubit }
    }

    /// RY on `qubit`.
    pub fn ry(qubit: usize) -> Self {
        Self::Rotation { axis: Axis::Y, qubit }
    }

    /// RZ on `qubit`.
    pub fn rz(qubit: usize) -> Self {
        Self::Rotation { axis: Axis::Z, qubit }
    }

    fn is_parametrized(&self) -> bool {
        matches!(self, Self::Rotation { .. })
    }

    fn qubits(&self) -> [Option<usize>; 2] {
        match *self {
            Self::H(q) | Self::X(q) | Self::Rotation { qubit: q, .. } => [Some(q), None],
            Self::Cx { control, target } => [Some(control), Some(target)],
        }
    }
}

/// A parametrized circuit on a fixed register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ansatz {
    num_qubits: usize,
    layers: Vec<Vec<Operation>>,
    num_params: usize,
}

impl Ansatz {
    /// Empty circuit on `num_qubits` qubits.
    ///
    /// Fails with [`DeviceError::RegisterTooWide`] above [`MAX_QUBITS`].
    pub fn new(num_qubits: usize) -> DeviceResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(DeviceError::RegisterTooWide {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            layers: Vec::new(),
            num_params: 0,
        })
    }

    /// Append a layer.
    pub fn push_layer(&mut self, ops: Vec<Operation>) -> DeviceResult<()> {
        for op in &ops {
            if let Operation::Cx { control, target } = *op {
                if control == target {
                    return Err(DeviceError::RepeatedQubit(control));
                }
            }
            for qubit in op.qubits().into_iter().flatten() {
                if qubit >= self.num_qubits {
                    return Err(DeviceError::QubitOutOfRange {
                        qubit,
                        num_qubits: self.num_qubits,
                    });
                }
            }
        }
        self.num_params += ops.iter().filter(|op| op.is_parametrized()).count();
        self.layers.push(ops);
        Ok(())
    }

    /// Builder form of [`push_layer`](Self::push_layer).
    pub fn with_layer(mut self, ops: Vec<Operation>) -> DeviceResult<Self> {
        self.push_layer(ops)?;
        Ok(self)
    }

    /// RX(θ₀) followed by RY(θ₁) on one qubit, each in its own layer.
    pub fn single_qubit() -> Self {
        Self {
            num_qubits: 1,
            layers: vec![vec![Operation::rx(0)], vec![Operation::ry(0)]],
            num_params: 2,
        }
    }

    /// `reps` repetitions of an RY layer followed by a linear CNOT chain,
    /// closed by a final RY layer.
    pub fn hardware_efficient(num_qubits: usize, reps: usize) -> DeviceResult<Self> {
        let rotations = || (0..num_qubits).map(Operation::ry).collect::<Vec<_>>();
        let mut ansatz = Self::new(num_qubits)?;
        for _ in 0..reps {
            ansatz.push_layer(rotations())?;
            let chain = (0..num_qubits.saturating_sub(1))
                .map(|q| Operation::Cx {
                    control: q,
                    target: q + 1,
                })
                .collect();
            ansatz.push_layer(chain)?;
        }
        ansatz.push_layer(rotations())?;
        Ok(ansatz)
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of parameters consumed.
    pub fn num_params(&self) -> usize {
        self.num_params
    }

    /// The layers, in application order.
    pub fn layers(&self) -> &[Vec<Operation>] {
        &self.layers
    }

    /// Parameter index ranges of the layers that hold rotations.
    pub fn param_blocks(&self) -> Vec<Range<usize>> {
        let mut blocks = Vec::new();
        let mut start = 0;
        for layer in &self.layers {
            let n = layer.iter().filter(|op| op.is_parametrized()).count();
            if n > 0 {
                blocks.push(start..start + n);
                start += n;
            }
        }
        blocks
    }

    /// Run the circuit from |0...0⟩.
    pub fn prepare(&self, params: &[f64]) -> DeviceResult<Statevector> {
        if params.len() != self.num_params {
            return Err(DeviceError::ParameterCount {
                expected: self.num_params,
                actual: params.len(),
            });
        }
        let mut state = Statevector::new(self.num_qubits);
        let mut angles = params.iter().copied();
        for op in self.layers.iter().flatten() {
            match *op {
                Operation::H(q) => state.h(q),
                Operation::X(q) => state.x(q),
                Operation::Cx { control, target } => state.cx(control, target),
                Operation::Rotation { axis, qubit } => {
                    // num_params counts exactly the rotations, checked above
                    let theta = angles.next().unwrap_or_default();
                    match axis {
                        Axis::X => state.rx(qubit, theta),
                        Axis::Y => state.ry(qubit, theta),
                        Axis::Z => state.rz(qubit, theta),
                    }
                }
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::PauliString;
    use approx::assert_relative_eq;

    #[test]
    fn single_qubit_layout() {
        let a = Ansatz::single_qubit();
        assert_eq!(a.num_params(), 2);
        assert_eq!(a.param_blocks(), vec![0..1, 1..2]);
    }

    #[test]
    fn single_qubit_state() {
        let a = Ansatz::single_qubit();
        let (t0, t1) = (0.3_f64, 0.9_f64);
        let state = a.prepare(&[t0, t1]).unwrap();
        let z: PauliString = "Z0".parse().unwrap();
        let x: PauliString = "X0".parse().unwrap();
        assert_relative_eq!(state.expectation(&z).unwrap(), t0.cos() * t1.cos(), epsilon = 1e-12);
        assert_relative_eq!(state.expectation(&x).unwrap(), t0.cos() * t1.sin(), epsilon = 1e-12);
    }

    #[test]
    fn wrong_parameter_count() {
        let err = Ansatz::single_qubit().prepare(&[0.1]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::ParameterCount { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn hardware_efficient_blocks() {
        let a = Ansatz::hardware_efficient(3, 2).unwrap();
        assert_eq!(a.num_params(), 9);
        assert_eq!(a.param_blocks(), vec![0..3, 3..6, 6..9]);
        let state = a.prepare(&[0.0; 9]).unwrap();
        assert_relative_eq!(state.amplitudes()[0].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_layers_rejected() {
        let mut a = Ansatz::new(2).unwrap();
        assert!(matches!(
            a.push_layer(vec![Operation::rx(2)]),
            Err(DeviceError::QubitOutOfRange { qubit: 2, .. })
        ));
        assert!(matches!(
            a.push_layer(vec![Operation::Cx { control: 1, target: 1 }]),
            Err(DeviceError::RepeatedQubit(1))
        ));
        assert_eq!(a.num_params(), 0);
    }

    #[test]
    fn register_width_is_capped() {
        assert!(Ansatz::new(MAX_QUBITS).is_ok());
        assert!(matches!(
            Ansatz::new(MAX_QUBITS + 1),
            Err(DeviceError::RegisterTooWide { num_qubits: 25, max: MAX_QUBITS })
        ));
        assert!(matches!(
            Ansatz::hardware_efficient(64, 0),
            Err(DeviceError::RegisterTooWide { num_qubits: 64, .. })
        ));
    }
}

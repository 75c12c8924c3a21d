//! Hamiltonians as weighted sums of Pauli strings.
//!
//!   H = Σ_k  c_k · P_k
//!
//! # Example
//!
//! ```rust
//! use vqe_device::{Hamiltonian, PauliString};
//!
//! // H = X₀ + Z₀, built from parallel coefficient / observable lists
//! let h = Hamiltonian::from_coeffs_and_observables(
//!     &[1.0, 1.0],
//!     vec!["X0".parse().unwrap(), "Z0".parse().unwrap()],
//! )
//! .unwrap();
//! assert_eq!(h, "1.0 * X0 + 1.0 * Z0".parse::<Hamiltonian>().unwrap());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};
use crate::statevector::Statevector;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::I => 'I',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Identity factors are dropped and the rest sorted by qubit, so two strings
/// describing the same operator compare equal.
///
/// Parses from space- or `@`-separated factors such as `"X0 Z1"` or
/// `"X0 @ Z1"`; a lone `"I"` is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Build from `(qubit, op)` pairs.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// The identity string.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Non-identity factors, sorted by qubit.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True for the identity.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Highest qubit referenced.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{op}{q}")?;
        }
        Ok(())
    }
}

impl FromStr for PauliString {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ops = Vec::new();
        let mut seen = Vec::new();
        for token in s.split(|c: char| c.is_whitespace() || c == '@').filter(|t| !t.is_empty()) {
            let mut chars = token.chars();
            let op = chars
                .next()
                .and_then(PauliOp::from_char)
                .ok_or_else(|| DeviceError::Parse(format!("invalid Pauli factor '{token}'")))?;
            let index = chars.as_str();
            if index.is_empty() {
                if op == PauliOp::I {
                    continue;
                }
                return Err(DeviceError::Parse(format!("missing qubit index in '{token}'")));
            }
            let qubit: u32 = index
                .parse()
                .map_err(|_| DeviceError::Parse(format!("invalid qubit index in '{token}'")))?;
            if seen.contains(&qubit) {
                return Err(DeviceError::Parse(format!("qubit {qubit} appears twice in '{s}'")));
            }
            seen.push(qubit);
            ops.push((qubit, op));
        }
        if seen.is_empty() && !s.trim().starts_with('I') {
            return Err(DeviceError::Parse(format!("empty Pauli string '{s}'")));
        }
        Ok(Self::from_ops(ops))
    }
}

/// One weighted term `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }
}

/// A sum-of-Pauli-strings Hamiltonian.
///
/// Parses from `"c₁ * P₁ + c₂ * P₂ ..."`; a term without `*` has weight 1
/// and `" - "` between terms negates the next coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: Vec<HamiltonianTerm>,
}

impl Hamiltonian {
    /// Create from terms. Fails on an empty list.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> DeviceResult<Self> {
        if terms.is_empty() {
            return Err(DeviceError::EmptyHamiltonian);
        }
        Ok(Self { terms })
    }

    /// Pair `coeffs[k]` with `observables[k]`.
    pub fn from_coeffs_and_observables(
        coeffs: &[f64],
        observables: Vec<PauliString>,
    ) -> DeviceResult<Self> {
        if coeffs.len() != observables.len() {
            return Err(DeviceError::TermCountMismatch {
                coeffs: coeffs.len(),
                observables: observables.len(),
            });
        }
        Self::from_terms(
            coeffs
                .iter()
                .zip(observables)
                .map(|(&c, p)| HamiltonianTerm::new(c, p))
                .collect(),
        )
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Smallest register that holds every referenced qubit.
    pub fn min_qubits(&self) -> usize {
        self.terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .max()
            .map_or(0, |q| q as usize + 1)
    }

    /// ⟨ψ|H|ψ⟩.
    pub fn expectation(&self, state: &Statevector) -> DeviceResult<f64> {
        self.terms.iter().try_fold(0.0, |acc, term| {
            Ok(acc + term.coeff * state.expectation(&term.pauli)?)
        })
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{:?} * {}", term.coeff, term.pauli)?;
        }
        Ok(())
    }
}

impl FromStr for Hamiltonian {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace(" - ", " + -");
        let terms = split_terms(&normalized)
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(parse_term)
            .collect::<DeviceResult<Vec<_>>>()?;
        Self::from_terms(terms)
    }
}

/// Split on `+` separators, leaving exponent signs such as `2.5e+1` intact.
fn split_terms(s: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (i, c) in s.char_indices() {
        if c == '+' && !matches!(prev, Some('e' | 'E')) {
            terms.push(&s[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    terms.push(&s[start..]);
    terms
}

fn parse_term(term: &str) -> DeviceResult<HamiltonianTerm> {
    match term.split_once('*') {
        Some((coeff, pauli)) => {
            let coeff = coeff.trim();
            let coeff: f64 = coeff
                .parse()
                .map_err(|_| DeviceError::Parse(format!("invalid coefficient '{coeff}'")))?;
            Ok(HamiltonianTerm::new(coeff, pauli.trim().parse()?))
        }
        None => match term.strip_prefix('-') {
            Some(rest) => Ok(HamiltonianTerm::new(-1.0, rest.trim().parse()?)),
            None => Ok(HamiltonianTerm::new(1.0, term.parse()?)),
        },
    }
}

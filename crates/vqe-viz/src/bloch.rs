//! Bloch-sphere projection of single-qubit states.
//!
//! For |ψ⟩ = a|0⟩ + b|1⟩ (normalized):
//!
//! ```text
//!   x = ⟨σx⟩ = 2 Re(a* b)
//!   y = ⟨σy⟩ = 2 Im(a* b)
//!   z = ⟨σz⟩ = |a|² − |b|²
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::thin;

/// L2-normalize a state vector.
///
/// Fails with [`VizError::ZeroNorm`] when the norm is zero or not finite.
pub fn normalize(state: &[Complex64]) -> VizResult<Vec<Complex64>> {
    let norm = state.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(VizError::ZeroNorm);
    }
    Ok(state.iter().map(|a| *a / norm).collect())
}

/// Bloch coordinates of a single-qubit state, normalized first.
pub fn project(state: &[Complex64]) -> VizResult<BlochPoint> {
    if state.len() != 2 {
        return Err(VizError::NotSingleQubit(state.len()));
    }
    let psi = normalize(state)?;
    let (a, b) = (psi[0], psi[1]);
    let coherence = a.conj() * b;
    Ok(BlochPoint {
        x: 2.0 * coherence.re,
        y: 2.0 * coherence.im,
        z: a.norm_sqr() - b.norm_sqr(),
    })
}

/// A point on (or, for mixed inputs, inside) the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochPoint {
    /// ⟨σx⟩.
    pub x: f64,
    /// ⟨σy⟩.
    pub y: f64,
    /// ⟨σz⟩.
    pub z: f64,
}

impl BlochPoint {
    /// Distance from the origin.
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A trajectory on the Bloch sphere in column form, ready for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlochPath {
    /// x coordinates.
    pub xs: Vec<f64>,
    /// y coordinates.
    pub ys: Vec<f64>,
    /// z coordinates.
    pub zs: Vec<f64>,
}

impl BlochPath {
    /// Project every state of a recorded history.
    pub fn from_states(states: &[Vec<Complex64>]) -> VizResult<Self> {
        states
            .iter()
            .map(|s| project(s))
            .collect::<VizResult<Vec<_>>>()
            .map(Self::from_points)
    }

    /// Build from points.
    pub fn from_points(points: impl IntoIterator<Item = BlochPoint>) -> Self {
        let mut path = Self::default();
        for p in points {
            path.xs.push(p.x);
            path.ys.push(p.y);
            path.zs.push(p.z);
        }
        path
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// True if there are no points.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Points in order.
    pub fn points(&self) -> impl Iterator<Item = BlochPoint> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .map(|((&x, &y), &z)| BlochPoint { x, y, z })
    }

    /// Every `stride`-th point, starting with the first.
    pub fn thinned(&self, stride: usize) -> VizResult<Self> {
        Ok(Self {
            xs: thin(&self.xs, stride)?,
            ys: thin(&self.ys, stride)?,
            zs: thin(&self.zs, stride)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn poles_and_equator() {
        let zero = project(&[c(1.0, 0.0), c(0.0, 0.0)]).unwrap();
        assert_eq!(zero, BlochPoint { x: 0.0, y: 0.0, z: 1.0 });

        let one = project(&[c(0.0, 0.0), c(1.0, 0.0)]).unwrap();
        assert_eq!(one.z, -1.0);

        let plus = project(&[c(1.0, 0.0), c(1.0, 0.0)]).unwrap();
        assert_relative_eq!(plus.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(plus.z, 0.0, epsilon = 1e-12);

        let plus_i = project(&[c(1.0, 0.0), c(0.0, 1.0)]).unwrap();
        assert_relative_eq!(plus_i.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unnormalized_input_projects_to_sphere() {
        let p = project(&[c(3.0, 0.0), c(0.0, 4.0)]).unwrap();
        assert_relative_eq!(p.radius(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_states() {
        assert!(matches!(normalize(&[c(0.0, 0.0); 2]), Err(VizError::ZeroNorm)));
        assert!(matches!(normalize(&[c(f64::NAN, 0.0)]), Err(VizError::ZeroNorm)));
        assert!(matches!(normalize(&[]), Err(VizError::ZeroNorm)));
        assert!(matches!(
            project(&[c(1.0, 0.0); 4]),
            Err(VizError::NotSingleQubit(4))
        ));
    }

    #[test]
    fn path_columns_and_thinning() {
        let states: Vec<Vec<Complex64>> = (0..5)
            .map(|k| {
                let t = f64::from(k) * 0.3;
                vec![c((t / 2.0).cos(), 0.0), c((t / 2.0).sin(), 0.0)]
            })
            .collect();
        let path = BlochPath::from_states(&states).unwrap();
        assert_eq!(path.len(), 5);
        assert_relative_eq!(path.zs[2], 0.6_f64.cos(), epsilon = 1e-12);

        let thin = path.thinned(2).unwrap();
        assert_eq!(thin.len(), 3);
        assert_eq!(thin.xs, vec![path.xs[0], path.xs[2], path.xs[4]]);
        assert!(matches!(path.thinned(0), Err(VizError::InvalidStride)));
    }
}

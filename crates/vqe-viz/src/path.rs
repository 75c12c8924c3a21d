//! Two-parameter optimization paths.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::thin;

/// A path through a two-dimensional parameter space, stored as columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterPath {
    theta0: Vec<f64>,
    theta1: Vec<f64>,
}

impl ParameterPath {
    /// Build from a parameter history.
    ///
    /// Every entry must have exactly two components.
    pub fn from_history(params: &[Vec<f64>]) -> VizResult<Self> {
        let mut path = Self {
            theta0: Vec::with_capacity(params.len()),
            theta1: Vec::with_capacity(params.len()),
        };
        for (index, p) in params.iter().enumerate() {
            let &[t0, t1] = p.as_slice() else {
                return Err(VizError::NotTwoDimensional {
                    index,
                    len: p.len(),
                });
            };
            path.theta0.push(t0);
            path.theta1.push(t1);
        }
        Ok(path)
    }

    /// First-parameter column.
    pub fn theta0(&self) -> &[f64] {
        &self.theta0
    }

    /// Second-parameter column.
    pub fn theta1(&self) -> &[f64] {
        &self.theta1
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.theta0.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.theta0.is_empty()
    }

    /// Every `stride`-th point, starting with the first.
    pub fn thinned(&self, stride: usize) -> VizResult<Self> {
        Ok(Self {
            theta0: thin(&self.theta0, stride)?,
            theta1: thin(&self.theta1, stride)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns() {
        let path = ParameterPath::from_history(&[vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(path.theta0(), &[0.1, 0.3]);
        assert_eq!(path.theta1(), &[0.2, 0.4]);
    }

    #[test]
    fn wrong_dimension_reports_index() {
        let err = ParameterPath::from_history(&[vec![0.1, 0.2], vec![0.3]]).unwrap_err();
        assert!(matches!(err, VizError::NotTwoDimensional { index: 1, len: 1 }));
    }

    #[test]
    fn empty_history() {
        assert!(ParameterPath::from_history(&[]).unwrap().is_empty());
    }

    #[test]
    fn thinning_keeps_first_point() {
        let params: Vec<Vec<f64>> = (0..10).map(|i| vec![f64::from(i), 0.0]).collect();
        let path = ParameterPath::from_history(&params).unwrap();
        assert_eq!(path.thinned(4).unwrap().theta0(), &[0.0, 4.0, 8.0]);
        assert_eq!(path.thinned(1).unwrap(), path);
        assert_eq!(path.thinned(100).unwrap().theta0(), &[0.0]);
    }
}

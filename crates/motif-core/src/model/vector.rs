use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A fixed-dimension embedding.
///
/// Vectors produced by the [`Embedder`](crate::Embedder) are unit length,
/// except the all-zero vector which is reserved for "no notes". The value
/// owns its components; cloning it into an index copies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f64>);

impl EmbeddingVector {
    /// Wrap raw components without normalizing them.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// The all-zero vector of the given dimension.
    #[must_use]
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    /// Scale `values` to unit Euclidean length.
    ///
    /// A zero-norm input is returned unchanged instead of being divided by
    /// zero.
    #[must_use]
    pub fn normalized(mut values: Vec<f64>) -> Self {
        let norm = l2_norm(&values);
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }
        Self(values)
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(&self) -> f64 {
        l2_norm(&self.0)
    }

    /// Whether every component is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Dot product with `other`.
    ///
    /// This is the cosine similarity only when both sides are unit vectors;
    /// nothing is re-normalized here. A zero vector on either side scores
    /// exactly `0.0`.
    pub fn dot(&self, other: &Self) -> Result<f64> {
        if self.dimension() != other.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        if self.is_zero() || other.is_zero() {
            return Ok(0.0);
        }
        Ok(self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum())
    }
}

impl From<Vec<f64>> for EmbeddingVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl AsRef<[f64]> for EmbeddingVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for EmbeddingVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value:.4}")?;
        }
        write!(f, "]")
    }
}

/// Euclidean norm, scaled by the largest magnitude so large finite
/// components do not overflow the sum of squares.
fn l2_norm(values: &[f64]) -> f64 {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = values.iter().map(|v| (v / scale).powi(2)).sum();
    scale * sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let v = EmbeddingVector::zeros(4);
        assert_eq!(v.dimension(), 4);
        assert!(v.is_zero());
        assert!(v.norm().abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_unit_length() {
        let v = EmbeddingVector::normalized(vec![3.0, 4.0]);
        assert!((v.as_slice()[0] - 0.6).abs() < 1e-12);
        assert!((v.as_slice()[1] - 0.8).abs() < 1e-12);
        assert!((v.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_zero_stays_zero() {
        let v = EmbeddingVector::normalized(vec![0.0; 4]);
        assert_eq!(v, EmbeddingVector::zeros(4));
    }

    #[test]
    fn test_normalized_large_components() {
        let v = EmbeddingVector::normalized(vec![1e200, 1e200]);
        assert!((v.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dot_unit_vectors() {
        let a = EmbeddingVector::new(vec![1.0, 0.0]);
        let b = EmbeddingVector::new(vec![0.6, 0.8]);
        assert!((a.dot(&b).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_dot_against_zero_is_zero() {
        let a = EmbeddingVector::normalized(vec![1.0, 2.0, 3.0, 4.0]);
        let zero = EmbeddingVector::zeros(4);
        assert_eq!(a.dot(&zero).unwrap(), 0.0);
        assert_eq!(zero.dot(&a).unwrap(), 0.0);
        assert_eq!(zero.dot(&zero).unwrap(), 0.0);
    }

    #[test]
    fn test_dot_dimension_mismatch() {
        let a = EmbeddingVector::zeros(4);
        let b = EmbeddingVector::zeros(3);
        assert_eq!(
            a.dot(&b),
            Err(Error::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_dot_does_not_renormalize() {
        let a = EmbeddingVector::new(vec![2.0, 0.0]);
        let b = EmbeddingVector::new(vec![3.0, 0.0]);
        assert!((a.dot(&b).unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let v = EmbeddingVector::new(vec![0.5, 0.25]);
        assert_eq!(v.to_string(), "[0.5000, 0.2500]");
    }

    #[test]
    fn test_serde_transparent() {
        let v = EmbeddingVector::new(vec![1.0, 0.0]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,0.0]");
    }
}

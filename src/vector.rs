//! Vector type and operations

use crate::error::{EmbeddingDbError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A dense vector of `f64` components.
///
/// Vectors are values: once built they are never mutated in place, so the
/// store can hand out shared references freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a new vector from a Vec<f64>
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Widen single-precision provider output
    pub fn from_f32(data: &[f32]) -> Self {
        Self::new(data.iter().map(|&x| f64::from(x)).collect())
    }

    /// Get the dimension of the vector
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Check if this vector has the same dimension as another
    pub fn has_same_dimension(&self, other: &Vector) -> bool {
        self.dimension() == other.dimension()
    }

    /// True when every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }

    /// Reject NaN and infinite components.
    pub fn ensure_finite(&self) -> Result<()> {
        match self.data.iter().position(|x| !x.is_finite()) {
            Some(i) => Err(EmbeddingDbError::InvalidVector {
                reason: format!("non-finite component at index {}", i),
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::new(data)
    }
}

/// Parses comma-separated values, e.g. `"1.0, 2.0, 3.0"`.
impl FromStr for Vector {
    type Err = EmbeddingDbError;

    fn from_str(s: &str) -> Result<Self> {
        let data: Result<Vec<f64>> = s
            .split(',')
            .map(|x| {
                x.trim()
                    .parse::<f64>()
                    .map_err(|_| EmbeddingDbError::InvalidVector {
                        reason: format!("Invalid float: {}", x.trim()),
                    })
            })
            .collect();
        Ok(Vector::new(data?))
    }
}

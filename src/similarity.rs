//! Cosine similarity over dense vectors

use crate::error::{EmbeddingDbError, Result};
use crate::vector::Vector;

/// Cosine similarity of two vectors, in `[-1, 1]`.
///
/// Fails with `DimensionMismatch` when the lengths differ and with `ZeroVector`
/// when either operand has zero norm. NaN or infinite components fail with
/// `InvalidVector`. Each operand is divided by its largest absolute component
/// first, so neither huge nor tiny magnitudes overflow or underflow the norms.
pub fn cosine_similarity(v1: &Vector, v2: &Vector) -> Result<f64> {
    if !v1.has_same_dimension(v2) {
        return Err(EmbeddingDbError::DimensionMismatch {
            expected: v1.dimension(),
            actual: v2.dimension(),
        });
    }

    v1.ensure_finite()?;
    v2.ensure_finite()?;

    let scale1 = max_abs(v1);
    let scale2 = max_abs(v2);

    if scale1 == 0.0 || scale2 == 0.0 {
        return Err(EmbeddingDbError::ZeroVector);
    }

    let mut dot = 0.0;
    let mut sq1 = 0.0;
    let mut sq2 = 0.0;
    for (a, b) in v1.as_slice().iter().zip(v2.as_slice()) {
        let a = a / scale1;
        let b = b / scale2;
        dot += a * b;
        sq1 += a * a;
        sq2 += b * b;
    }

    // Both sums are at least 1: the largest component scales to +-1
    let similarity = dot / (sq1.sqrt() * sq2.sqrt());

    // Clamp to [-1, 1] to handle floating point errors
    Ok(similarity.clamp(-1.0, 1.0))
}

fn max_abs(v: &Vector) -> f64 {
    v.as_slice().iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

#[cfg(test)]
pub(crate) fn negated(v: &Vector) -> Vector {
    Vector::new(v.as_slice().iter().map(|x| -x).collect())
}

use crate::SparseVector;

/// Cosine similarity between two sparse vectors.
///
/// Returns 0 when either vector is zero.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    // Clamp to [-1, 1] to handle floating point errors.
    (a.dot(b) / denom).clamp(-1.0, 1.0)
}
